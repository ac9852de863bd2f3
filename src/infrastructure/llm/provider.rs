use async_trait::async_trait;

use crate::application::ports::{ProviderBackend, ProviderError};
use crate::domain::{BudgetResponse, LlmConfig, ProviderKind};

use super::agno_backend::AgnoBackend;
use super::gemini_backend::GeminiBackend;
use super::openai_backend::OpenAiBackend;

/// One system prompt and JSON contract shared by every backend, so the
/// configured provider changes budget quality only, never the interface.
pub const SYSTEM_PROMPT: &str = r#"You are an expert in cost proposals and project analysis. Based on text extracted from documents, you must produce a detailed and realistic budget.

ALWAYS respond with valid JSON using the following structure:
{
  "title": "Project title",
  "description": "Short description",
  "items": [
    {
      "description": "Item description",
      "quantity": 1,
      "unitPrice": 1000,
      "totalPrice": 1000,
      "category": "Category"
    }
  ],
  "totalValue": 0,
  "estimatedTime": "X weeks/months",
  "confidence": 85
}"#;

/// Closed set of model backends, each variant carrying its own configured
/// client. Dispatch is a plain match, so adding a backend is a compile-time
/// change rather than a runtime registry surprise.
pub enum LlmProvider {
    OpenAi(OpenAiBackend),
    Gemini(GeminiBackend),
    Agno(AgnoBackend),
}

impl LlmProvider {
    pub fn configure(kind: ProviderKind, config: &LlmConfig) -> Self {
        match kind {
            ProviderKind::OpenAi => Self::OpenAi(OpenAiBackend::new(config)),
            ProviderKind::Gemini => Self::Gemini(GeminiBackend::new(config)),
            ProviderKind::Agno => Self::Agno(AgnoBackend::new(config)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::Agno(_) => ProviderKind::Agno,
        }
    }
}

#[async_trait]
impl ProviderBackend for LlmProvider {
    async fn generate_budget(
        &self,
        prompt: &str,
        document_text: &str,
    ) -> Result<BudgetResponse, ProviderError> {
        match self {
            Self::OpenAi(backend) => backend.generate_budget(prompt, document_text).await,
            Self::Gemini(backend) => backend.generate_budget(prompt, document_text).await,
            Self::Agno(backend) => backend.generate_budget(prompt, document_text).await,
        }
    }

    async fn generate_response(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Self::OpenAi(backend) => backend.generate_response(prompt).await,
            Self::Gemini(backend) => backend.generate_response(prompt).await,
            Self::Agno(backend) => backend.generate_response(prompt).await,
        }
    }
}
