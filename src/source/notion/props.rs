//! Typed decoding of Notion page property values.
//!
//! The API returns properties as `{"type": "...", "<type>": {...}}`
//! objects. Decoding them into a tagged enum keeps missing-field handling
//! exhaustive: every accessor is total and absent or malformed properties
//! yield empty defaults instead of panicking.

use serde_json::{Map, Value};

/// A decoded Notion property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Select(Option<String>),
    Date(Option<String>),
    MultiSelect(Vec<String>),
    Checkbox(bool),
}

impl PropertyValue {
    /// Decode one property object. Unknown property types yield `None`.
    pub fn decode(prop: &Value) -> Option<Self> {
        match prop.get("type")?.as_str()? {
            "title" => Some(Self::Title(plain_text(prop.get("title")?))),
            "rich_text" => Some(Self::RichText(plain_text(prop.get("rich_text")?))),
            "select" => Some(Self::Select(
                prop.get("select")
                    .and_then(|s| s.get("name"))
                    .and_then(Value::as_str)
                    .map(String::from),
            )),
            "date" => Some(Self::Date(
                prop.get("date")
                    .and_then(|d| d.get("start"))
                    .and_then(Value::as_str)
                    .map(String::from),
            )),
            "multi_select" => Some(Self::MultiSelect(
                prop.get("multi_select")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|i| i.get("name").and_then(Value::as_str))
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            )),
            "checkbox" => Some(Self::Checkbox(
                prop.get("checkbox").and_then(Value::as_bool).unwrap_or(false),
            )),
            _ => None,
        }
    }

    /// Text content for title/rich_text/select properties, empty-filtered.
    pub fn as_text(&self) -> Option<&str> {
        let text = match self {
            Self::Title(s) | Self::RichText(s) => s.as_str(),
            Self::Select(Some(s)) => s.as_str(),
            Self::Date(Some(s)) => s.as_str(),
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Concatenated `plain_text` of a rich-text array.
fn plain_text(items: &Value) -> String {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Text of a named property, if present and non-empty.
pub fn text(props: &Map<String, Value>, name: &str) -> Option<String> {
    props
        .get(name)
        .and_then(PropertyValue::decode)
        .and_then(|v| v.as_text().map(String::from))
}

/// Names of a multi-select property (empty when absent).
pub fn list(props: &Map<String, Value>, name: &str) -> Vec<String> {
    match props.get(name).and_then(PropertyValue::decode) {
        Some(PropertyValue::MultiSelect(names)) => names,
        _ => Vec::new(),
    }
}

/// Value of a checkbox property (false when absent).
pub fn flag(props: &Map<String, Value>, name: &str) -> bool {
    matches!(
        props.get(name).and_then(PropertyValue::decode),
        Some(PropertyValue::Checkbox(true))
    )
}
