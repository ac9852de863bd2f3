use std::collections::HashMap;

use crate::application::ports::{ProviderBackend, ProviderError};
use crate::domain::{BudgetGenerationOptions, BudgetResponse, LlmConfig, ProviderKind};
use crate::infrastructure::llm::LlmProvider;

#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("provider {0} not configured")]
    ProviderNotConfigured(ProviderKind),
    #[error("budget generation failed: {0}")]
    GenerationFailed(#[from] ProviderError),
}

/// Registry of configured model backends plus the shared prompt
/// construction. Generation failures are raised, never swallowed: there is
/// no safe structural default for a missing budget.
#[derive(Default)]
pub struct BudgetGenerator {
    providers: HashMap<ProviderKind, LlmProvider>,
}

impl BudgetGenerator {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register (or replace) a backend. Credentials are opaque pass-through
    /// values; `LlmConfig`'s `Debug` masks them.
    pub fn configure_provider(&mut self, kind: ProviderKind, config: &LlmConfig) {
        tracing::info!(provider = %kind, config = ?config, "configuring budget provider");
        self.providers.insert(kind, LlmProvider::configure(kind, config));
    }

    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    pub fn is_provider_configured(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    #[tracing::instrument(skip(self, document_text, options), fields(provider = %options.provider))]
    pub async fn generate_budget(
        &self,
        document_text: &str,
        options: &BudgetGenerationOptions,
    ) -> Result<BudgetResponse, BudgetError> {
        let provider = self
            .providers
            .get(&options.provider)
            .ok_or(BudgetError::ProviderNotConfigured(options.provider))?;

        let prompt = Self::build_prompt(options);
        let budget = provider.generate_budget(&prompt, document_text).await?;

        tracing::info!(
            items = budget.items.len(),
            total_value = budget.total_value,
            confidence = budget.confidence,
            "budget generated"
        );

        Ok(budget)
    }

    pub async fn generate_response(
        &self,
        kind: ProviderKind,
        prompt: &str,
    ) -> Result<String, BudgetError> {
        let provider = self
            .providers
            .get(&kind)
            .ok_or(BudgetError::ProviderNotConfigured(kind))?;

        Ok(provider.generate_response(prompt).await?)
    }

    /// Layer the caller's template, verbosity flag and currency hint over
    /// the fixed pricing guidance.
    pub fn build_prompt(options: &BudgetGenerationOptions) -> String {
        let mut prompt =
            String::from("Generate a detailed budget based on the provided document.");

        if let Some(template) = &options.template {
            prompt.push_str(&format!("\n\nUse the following template as a base:\n{template}"));
        }

        if options.include_details {
            prompt.push_str("\n\nInclude technical details and a justification for each item.");
        }

        if let Some(currency) = &options.currency {
            prompt.push_str(&format!("\n\nUse currency: {currency}"));
        }

        prompt.push_str("\n\nTake into account:");
        prompt.push_str("\n- Realistic market pricing");
        prompt.push_str("\n- An adequate profit margin");
        prompt.push_str("\n- The technical complexity of the project");
        prompt.push_str("\n- Estimated execution time");
        prompt.push_str("\n- Required resources");

        prompt
    }
}
