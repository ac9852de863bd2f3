use regex::Regex;
use std::sync::LazyLock;

use crate::application::ports::ProviderError;
use crate::domain::BudgetResponse;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\n?|\n?```").unwrap());

/// Strict parse of a provider reply into a budget. Fenced code blocks are
/// stripped first (some backends wrap their JSON), everything else must be
/// schema-valid JSON. Line and grand totals are recomputed from quantity
/// and unit price, so a budget leaving this function always satisfies the
/// arithmetic invariant.
pub fn parse_budget_response(raw: &str) -> Result<BudgetResponse, ProviderError> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let mut budget: BudgetResponse = serde_json::from_str(cleaned)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed budget JSON: {e}")))?;

    if budget.items.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "budget has no line items".to_string(),
        ));
    }

    if budget
        .items
        .iter()
        .any(|item| !item.quantity.is_finite() || !item.unit_price.is_finite())
    {
        return Err(ProviderError::InvalidResponse(
            "budget contains non-finite amounts".to_string(),
        ));
    }

    if !budget.totals_consistent() {
        budget.normalize_totals();
    }

    Ok(budget)
}
