use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ProviderBackend, ProviderError};
use crate::domain::{BudgetResponse, LlmConfig};
use crate::infrastructure::observability::sanitize_prompt;

use super::provider::SYSTEM_PROMPT;
use super::response_parser::parse_budget_response;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const BUDGET_MAX_TOKENS: u32 = 2000;
const RESPONSE_MAX_TOKENS: u32 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: config.max_tokens.unwrap_or(BUDGET_MAX_TOKENS),
        }
    }

    async fn chat(
        &self,
        messages: serde_json::Value,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequestFailed(format!("openai request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiRequestFailed(format!(
                "openai returned {status}: {text}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("openai JSON parse: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl ProviderBackend for OpenAiBackend {
    async fn generate_budget(
        &self,
        prompt: &str,
        document_text: &str,
    ) -> Result<BudgetResponse, ProviderError> {
        tracing::debug!(model = %self.model, prompt = %sanitize_prompt(prompt), "generating budget via openai");

        let user_prompt = format!("{prompt}\n\nDocument text:\n{document_text}");
        let messages = serde_json::json!([
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt },
        ]);

        let content = self.chat(messages, self.max_tokens).await?;
        parse_budget_response(&content)
    }

    async fn generate_response(&self, prompt: &str) -> Result<String, ProviderError> {
        let messages = serde_json::json!([
            { "role": "user", "content": prompt },
        ]);
        self.chat(messages, RESPONSE_MAX_TOKENS).await
    }
}
