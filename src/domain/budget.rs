use serde::{Deserialize, Serialize};

/// Structured cost proposal produced from document text. Identity and
/// timestamps are assigned by the persistence layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub title: String,
    pub description: String,
    pub items: Vec<BudgetItem>,
    pub total_value: f64,
    pub estimated_time: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub const TOTALS_TOLERANCE: f64 = 1e-6;

impl BudgetResponse {
    /// Whether every line total equals quantity * unit price and the grand
    /// total equals the sum of line totals, within [`TOTALS_TOLERANCE`].
    pub fn totals_consistent(&self) -> bool {
        let items_ok = self
            .items
            .iter()
            .all(|item| (item.quantity * item.unit_price - item.total_price).abs() <= TOTALS_TOLERANCE);
        let sum: f64 = self.items.iter().map(|item| item.total_price).sum();
        items_ok && (sum - self.total_value).abs() <= TOTALS_TOLERANCE
    }

    /// Recompute line and grand totals from quantity and unit price. Model
    /// backends round inconsistently; the arithmetic invariant is enforced
    /// here rather than trusted from the wire.
    pub fn normalize_totals(&mut self) {
        for item in &mut self.items {
            item.total_price = item.quantity * item.unit_price;
        }
        self.total_value = self.items.iter().map(|item| item.total_price).sum();
    }
}

/// Names the closed set of configurable model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Agno,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
            Self::Agno => write!(f, "agno"),
        }
    }
}

/// Credentials and tuning for one model backend. The key is an opaque
/// pass-through value; `Debug` masks it so it can never leak into logs.
#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetGenerationOptions {
    pub provider: ProviderKind,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub include_details: bool,
    #[serde(default)]
    pub currency: Option<String>,
}

impl BudgetGenerationOptions {
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            template: None,
            include_details: false,
            currency: None,
        }
    }
}
