use tarifa::application::services::{BudgetError, BudgetGenerator};
use tarifa::domain::{BudgetGenerationOptions, BudgetResponse, LlmConfig, ProviderKind};
use tarifa::infrastructure::llm::parse_budget_response;

fn config(api_key: &str) -> LlmConfig {
    LlmConfig {
        api_key: api_key.to_string(),
        model: None,
        temperature: None,
        max_tokens: None,
        base_url: None,
    }
}

const VALID_BUDGET_JSON: &str = r#"{
    "title": "Kitchen renovation",
    "description": "Full renovation of a residential kitchen",
    "items": [
        {
            "description": "Demolition and disposal",
            "quantity": 1,
            "unitPrice": 1500.0,
            "totalPrice": 1500.0,
            "category": "Labor"
        },
        {
            "description": "Cabinet installation",
            "quantity": 4,
            "unitPrice": 800.0,
            "totalPrice": 3200.0
        }
    ],
    "totalValue": 4700.0,
    "estimatedTime": "6 weeks",
    "confidence": 85
}"#;

#[tokio::test]
async fn given_unregistered_provider_when_generating_then_raises_without_network_call() {
    let generator = BudgetGenerator::new();
    let options = BudgetGenerationOptions::for_provider(ProviderKind::Gemini);

    let result = generator.generate_budget("document text", &options).await;

    assert!(matches!(
        result,
        Err(BudgetError::ProviderNotConfigured(ProviderKind::Gemini))
    ));
}

#[tokio::test]
async fn given_unregistered_provider_when_asking_for_response_then_raises() {
    let generator = BudgetGenerator::new();

    let result = generator
        .generate_response(ProviderKind::Agno, "hello")
        .await;

    assert!(matches!(
        result,
        Err(BudgetError::ProviderNotConfigured(ProviderKind::Agno))
    ));
}

#[test]
fn given_configured_provider_when_querying_registry_then_it_is_listed() {
    let mut generator = BudgetGenerator::new();
    generator.configure_provider(ProviderKind::OpenAi, &config("sk-test"));

    assert!(generator.is_provider_configured(ProviderKind::OpenAi));
    assert!(!generator.is_provider_configured(ProviderKind::Gemini));
    assert_eq!(generator.available_providers(), vec![ProviderKind::OpenAi]);
}

#[test]
fn given_generation_options_when_building_prompt_then_layers_every_hint() {
    let options = BudgetGenerationOptions {
        provider: ProviderKind::OpenAi,
        template: Some("Line item table".to_string()),
        include_details: true,
        currency: Some("BRL".to_string()),
    };

    let prompt = BudgetGenerator::build_prompt(&options);

    assert!(prompt.contains("Use the following template as a base:\nLine item table"));
    assert!(prompt.contains("Include technical details"));
    assert!(prompt.contains("Use currency: BRL"));
    assert!(prompt.contains("Realistic market pricing"));
    assert!(prompt.contains("Estimated execution time"));
}

#[test]
fn given_bare_options_when_building_prompt_then_only_fixed_guidance_remains() {
    let options = BudgetGenerationOptions::for_provider(ProviderKind::Agno);

    let prompt = BudgetGenerator::build_prompt(&options);

    assert!(!prompt.contains("template"));
    assert!(!prompt.contains("currency"));
    assert!(prompt.contains("adequate profit margin"));
}

#[test]
fn given_valid_json_when_parsing_response_then_returns_budget() {
    let budget = parse_budget_response(VALID_BUDGET_JSON).unwrap();

    assert_eq!(budget.title, "Kitchen renovation");
    assert_eq!(budget.items.len(), 2);
    assert_eq!(budget.items[1].category, None);
    assert!(budget.totals_consistent());
}

#[test]
fn given_fenced_json_when_parsing_response_then_strips_the_fence() {
    let fenced = format!("```json\n{VALID_BUDGET_JSON}\n```");

    let budget = parse_budget_response(&fenced).unwrap();

    assert_eq!(budget.title, "Kitchen renovation");
}

#[test]
fn given_plain_fence_when_parsing_response_then_strips_it_too() {
    let fenced = format!("```\n{VALID_BUDGET_JSON}\n```");

    let budget = parse_budget_response(&fenced).unwrap();

    assert_eq!(budget.total_value, 4700.0);
}

#[test]
fn given_non_json_response_when_parsing_then_generation_fails() {
    let result = parse_budget_response("Here is your budget: forty thousand, trust me");

    assert!(result.is_err());
}

#[test]
fn given_budget_without_items_when_parsing_then_rejects_it() {
    let empty_items = r#"{
        "title": "Nothing",
        "description": "No items",
        "items": [],
        "totalValue": 0,
        "estimatedTime": "none",
        "confidence": 10
    }"#;

    let result = parse_budget_response(empty_items);

    assert!(result.is_err());
}

#[test]
fn given_inconsistent_totals_when_parsing_then_recomputes_them() {
    let drifted = r#"{
        "title": "Drifted",
        "description": "Provider rounded the totals",
        "items": [
            {
                "description": "Masonry",
                "quantity": 3,
                "unitPrice": 100.0,
                "totalPrice": 305.0
            }
        ],
        "totalValue": 99.0,
        "estimatedTime": "1 week",
        "confidence": 70
    }"#;

    let budget = parse_budget_response(drifted).unwrap();

    assert!(budget.totals_consistent());
    assert_eq!(budget.items[0].total_price, 300.0);
    assert_eq!(budget.total_value, 300.0);
}

#[test]
fn given_consistent_budget_when_checking_totals_then_tolerance_allows_rounding() {
    let mut budget: BudgetResponse = serde_json::from_str(VALID_BUDGET_JSON).unwrap();
    budget.items[0].total_price += 5e-7;
    budget.total_value += 5e-7;

    assert!(budget.totals_consistent());
}

#[test]
fn given_llm_config_when_debug_formatting_then_api_key_is_masked() {
    let rendered = format!("{:?}", config("sk-very-secret-key"));

    assert!(!rendered.contains("sk-very-secret-key"));
    assert!(rendered.contains("[REDACTED]"));
}
