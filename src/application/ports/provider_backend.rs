use async_trait::async_trait;

use crate::domain::BudgetResponse;

/// Capability shared by every model backend: turn a prompt plus document
/// text into a schema-valid budget, or answer a free-form prompt. The same
/// system prompt and JSON contract apply to every implementation, so a
/// backend swap changes budget quality only, never the interface.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    async fn generate_budget(
        &self,
        prompt: &str,
        document_text: &str,
    ) -> Result<BudgetResponse, ProviderError>;

    async fn generate_response(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("empty response from provider")]
    EmptyResponse,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
