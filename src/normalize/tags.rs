//! Tag normalization: list or delimited string in, clean list out.

use serde_json::Value;

/// Normalize a raw tags value into an ordered list of tag strings.
///
/// Accepts either a structured list or a single delimited string (comma,
/// Chinese comma/enumeration comma, or whitespace separated). Entries are
/// trimmed and empties dropped; absent input yields an empty list.
pub fn normalize_tags(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => split_tag_string(s),
        _ => Vec::new(),
    }
}

/// Split a delimited tag string on comma, Chinese comma (，), enumeration
/// comma (、) or whitespace.
fn split_tag_string(s: &str) -> Vec<String> {
    s.split(|c: char| matches!(c, ',' | '，' | '、') || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
