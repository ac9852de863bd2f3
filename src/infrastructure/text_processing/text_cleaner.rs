use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Formatting clean-up applied when a caller opts out of preserving the
/// source layout: line endings normalized, control characters dropped,
/// lines trimmed, space runs and blank-line runs collapsed.
pub fn clean_extracted_text(raw: &str) -> String {
    let normalized: String = raw
        .nfkc()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\r' || *c == '\t')
        .collect();
    let normalized = normalized.replace("\r\n", "\n").replace('\r', "\n");

    let mut result = String::with_capacity(normalized.len());
    let mut pending_blank = false;
    let mut first_line = true;

    for line in normalized.lines() {
        let trimmed = line.trim();
        let collapsed = SPACE_RUN.replace_all(trimmed, " ");

        if collapsed.is_empty() {
            pending_blank = !first_line;
            continue;
        }

        if !first_line {
            result.push('\n');
            if pending_blank {
                result.push('\n');
            }
        }
        result.push_str(&collapsed);
        pending_blank = false;
        first_line = false;
    }

    result
}
