use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ProviderBackend, ProviderError};
use crate::domain::{BudgetResponse, LlmConfig};
use crate::infrastructure::observability::sanitize_prompt;

use super::provider::SYSTEM_PROMPT;
use super::response_parser::parse_budget_response;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const BUDGET_MAX_TOKENS: u32 = 2000;
const RESPONSE_MAX_TOKENS: u32 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiBackend {
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: config.max_tokens.unwrap_or(BUDGET_MAX_TOKENS),
        }
    }

    async fn generate_content(
        &self,
        full_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": full_prompt } ] }
            ],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": max_tokens,
            }
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequestFailed(format!("gemini request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiRequestFailed(format!(
                "gemini returned {status}: {text}"
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("gemini JSON parse: {e}")))?;

        let content = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl ProviderBackend for GeminiBackend {
    async fn generate_budget(
        &self,
        prompt: &str,
        document_text: &str,
    ) -> Result<BudgetResponse, ProviderError> {
        tracing::debug!(model = %self.model, prompt = %sanitize_prompt(prompt), "generating budget via gemini");

        // Gemini has no separate system role here; the contract prompt is
        // prepended to the user content.
        let full_prompt =
            format!("{SYSTEM_PROMPT}\n\n{prompt}\n\nDocument text:\n{document_text}");

        let content = self.generate_content(&full_prompt, self.max_tokens).await?;
        parse_budget_response(&content)
    }

    async fn generate_response(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_content(prompt, RESPONSE_MAX_TOKENS).await
    }
}
