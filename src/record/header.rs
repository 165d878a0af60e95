//! Metadata header codec for materialized files.
//!
//! Each materialized file starts with a fenced key-value block:
//!
//! ```text
//! ---
//! title: "Getting Started"
//! summary: "How to \"start\""
//! tags: ["intro","setup"]
//! updatedAt: "2024-01-15T10:00:00Z"
//! language: "zh"
//! category: "product"
//! type: "note"
//! ---
//! body...
//! ```
//!
//! Scalars are double-quoted with internal quotes escaped; list values are
//! JSON arrays. The parser is deliberately tolerant: vault frontmatter
//! passes through the same code path and authors write bare values, odd
//! keys and the occasional broken line. Bad lines are skipped, never
//! fatal.

use serde_json::Value;

use crate::record::ContentRecord;

/// Header fence line.
const FENCE: &str = "---";

/// A parsed note: header fields plus the remaining body.
#[derive(Debug, Default)]
pub struct ParsedNote {
    pub fields: serde_json::Map<String, Value>,
    pub body: String,
}

impl ParsedNote {
    /// Field as a string, if present and scalar.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Serialize a record into header + body file content.
pub fn serialize(record: &ContentRecord) -> String {
    let tags = Value::Array(
        record
            .tags
            .iter()
            .map(|t| Value::String(t.clone()))
            .collect(),
    );
    format!(
        "{FENCE}\n\
         title: {}\n\
         summary: {}\n\
         tags: {}\n\
         updatedAt: {}\n\
         language: {}\n\
         category: {}\n\
         type: {}\n\
         {FENCE}\n\
         {}",
        quote(&record.title),
        quote(&record.summary),
        tags,
        quote(&record.updated_at),
        quote(record.language.tag()),
        quote(&record.category),
        quote(&record.kind),
        record.body,
    )
}

/// Parse header + body. Content without a leading fence parses as a
/// headerless note (all fields empty, full content as body).
pub fn parse(content: &str) -> ParsedNote {
    let Some(rest) = content.strip_prefix(FENCE) else {
        return ParsedNote {
            fields: serde_json::Map::new(),
            body: content.to_string(),
        };
    };
    let rest = rest.strip_prefix('\n').unwrap_or(rest);

    let Some(end) = rest.find("\n---") else {
        return ParsedNote {
            fields: serde_json::Map::new(),
            body: content.to_string(),
        };
    };
    let header = &rest[..end];
    let body = rest[end + 4..].strip_prefix('\n').unwrap_or("").to_string();

    let mut fields = serde_json::Map::new();
    for line in header.lines() {
        let Some((key, raw)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), parse_value(raw.trim()));
    }

    ParsedNote { fields, body }
}

/// Quote a scalar, escaping backslashes and internal double quotes.
fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Parse a header value: JSON array, quoted scalar, or bare scalar.
fn parse_value(raw: &str) -> Value {
    if raw.starts_with('[') {
        if let Ok(v) = serde_json::from_str::<Value>(raw) {
            return v;
        }
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        let inner = &raw[1..raw.len() - 1];
        return Value::String(unescape(inner));
    }
    Value::String(raw.to_string())
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(n) => out.push(n),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
