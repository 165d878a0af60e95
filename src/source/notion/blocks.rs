//! Notion block tree to Markdown conversion.

use serde_json::Value;

/// Render a flat list of blocks (one page's children) to Markdown.
///
/// Consecutive list items stay adjacent; everything else is separated by
/// a blank line. Unknown block types render as their plain text so odd
/// blocks degrade instead of disappearing.
pub fn to_markdown(blocks: &[Value]) -> String {
    let mut out = String::new();
    let mut prev_was_list = false;

    for block in blocks {
        let Some(kind) = block.get("type").and_then(Value::as_str) else {
            continue;
        };
        let Some(rendered) = render_block(block, kind) else {
            continue;
        };
        if rendered.is_empty() {
            continue;
        }

        let is_list = matches!(kind, "bulleted_list_item" | "numbered_list_item" | "to_do");
        if !out.is_empty() {
            out.push_str(if is_list && prev_was_list { "\n" } else { "\n\n" });
        }
        out.push_str(&rendered);
        prev_was_list = is_list;
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn render_block(block: &Value, kind: &str) -> Option<String> {
    let payload = block.get(kind)?;
    let text = || rich_text(payload.get("rich_text"));

    let rendered = match kind {
        "paragraph" => text(),
        "heading_1" => format!("# {}", text()),
        "heading_2" => format!("## {}", text()),
        "heading_3" => format!("### {}", text()),
        "bulleted_list_item" => format!("- {}", text()),
        "numbered_list_item" => format!("1. {}", text()),
        "to_do" => {
            let checked = payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            format!("- [{}] {}", if checked { "x" } else { " " }, text())
        }
        "quote" => format!("> {}", text()),
        "code" => {
            let lang = payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!("```{lang}\n{}\n```", text())
        }
        "divider" => "---".to_string(),
        "image" => {
            let url = payload
                .get("external")
                .or_else(|| payload.get("file"))
                .and_then(|f| f.get("url"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if url.is_empty() {
                return None;
            }
            format!("![]({url})")
        }
        _ => text(),
    };
    Some(rendered)
}

/// Render a rich-text array with basic annotations and links.
fn rich_text(items: Option<&Value>) -> String {
    let Some(items) = items.and_then(Value::as_array) else {
        return String::new();
    };

    let mut out = String::new();
    for item in items {
        let Some(plain) = item.get("plain_text").and_then(Value::as_str) else {
            continue;
        };
        let mut text = plain.to_string();

        if let Some(ann) = item.get("annotations") {
            let on = |key: &str| ann.get(key).and_then(Value::as_bool).unwrap_or(false);
            if on("code") {
                text = format!("`{text}`");
            }
            if on("bold") {
                text = format!("**{text}**");
            }
            if on("italic") {
                text = format!("*{text}*");
            }
        }

        if let Some(href) = item.get("href").and_then(Value::as_str) {
            text = format!("[{text}]({href})");
        }
        out.push_str(&text);
    }
    out
}
