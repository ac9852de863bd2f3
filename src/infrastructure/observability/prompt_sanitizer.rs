const MAX_VISIBLE_LENGTH: usize = 120;

const SENSITIVE_PREFIXES: &[(&str, &str)] = &[
    ("Bearer ", "Bearer [REDACTED]"),
    ("api_key=", "api_key=[REDACTED]"),
    ("apikey=", "apikey=[REDACTED]"),
    ("key=", "key=[REDACTED]"),
    ("password=", "password=[REDACTED]"),
    ("secret=", "secret=[REDACTED]"),
    ("token=", "token=[REDACTED]"),
];

/// Truncate and redact prompt text for safe logging. Prompts carry client
/// document content and may embed credentials pasted into documents, so
/// nothing leaves here un-redacted.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let visible_end = trimmed
        .char_indices()
        .map(|(i, _)| i)
        .nth(MAX_VISIBLE_LENGTH)
        .unwrap_or(trimmed.len());

    let sanitized = if visible_end < trimmed.len() {
        format!(
            "{}... ({} chars total)",
            &trimmed[..visible_end],
            trimmed.chars().count()
        )
    } else {
        trimmed.to_string()
    };

    redact_sensitive(&sanitized)
}

fn redact_sensitive(text: &str) -> String {
    let mut result = text.to_string();

    for (prefix, replacement) in SENSITIVE_PREFIXES {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(prefix) {
            let start = search_from + found;
            let value_start = start + prefix.len();
            if result[value_start..].starts_with("[REDACTED]") {
                search_from = value_start;
                continue;
            }
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..start], replacement, &result[value_end..]);
            search_from = start + replacement.len();
        }
    }

    result
}
