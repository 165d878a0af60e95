//! Blocking Notion API client: database query + block-children listing.
//!
//! Both endpoints paginate through an opaque cursor. The pagination loop
//! has two states: more pages while the response carries `next_cursor`,
//! done when it does not; the result is the concatenation of all pages in
//! request order.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::time::Duration;

use crate::debug;
use crate::normalize::Language;

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Max records/blocks per request, the API's cap.
pub const PAGE_SIZE: u32 = 100;

/// One page row from a database query.
#[derive(Debug)]
pub struct NotionPage {
    pub id: String,
    pub properties: Map<String, Value>,
    /// API-side edit timestamp, fallback marker when the Date property
    /// is empty.
    pub last_edited: Option<String>,
}

/// Blocking HTTP client for the Notion API.
pub struct NotionClient {
    http: reqwest::blocking::Client,
    token: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(token: String, database_id: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            token,
            database_id,
        })
    }

    /// Query published notes for one locale, sorted by Date descending.
    pub fn query_notes(&self, lang: Language) -> Result<Vec<NotionPage>> {
        let filter = json!({
            "and": [
                {"property": "Published", "checkbox": {"equals": true}},
                {"property": "Type", "select": {"equals": "note"}},
                {"property": "Language", "select": {"equals": lang.tag()}}
            ]
        });
        let sorts = json!([{"property": "Date", "direction": "descending"}]);

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({
                "filter": filter,
                "sorts": sorts,
                "page_size": PAGE_SIZE,
            });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let url = format!("{NOTION_API}/databases/{}/query", self.database_id);
            let response = self.post(&url, &body)?;

            for result in results(&response) {
                let Some(id) = result.get("id").and_then(Value::as_str) else {
                    continue;
                };
                pages.push(NotionPage {
                    id: id.to_string(),
                    properties: result
                        .get("properties")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                    last_edited: result
                        .get("last_edited_time")
                        .and_then(Value::as_str)
                        .map(String::from),
                });
            }

            cursor = next_cursor(&response);
            if cursor.is_none() {
                break;
            }
            debug!("notion"; "query continues at cursor {:?}", cursor);
        }
        Ok(pages)
    }

    /// Fetch all child blocks of a page, following the cursor until
    /// exhausted.
    pub fn page_blocks(&self, page_id: &str) -> Result<Vec<Value>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut url =
                format!("{NOTION_API}/blocks/{page_id}/children?page_size={PAGE_SIZE}");
            if let Some(cursor) = &cursor {
                url.push_str(&format!("&start_cursor={cursor}"));
            }

            let response = self.get(&url)?;
            blocks.extend(results(&response).iter().cloned());

            cursor = next_cursor(&response);
            if cursor.is_none() {
                break;
            }
        }
        Ok(blocks)
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        parse_response(url, response)
    }

    fn get(&self, url: &str) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        parse_response(url, response)
    }
}

fn parse_response(url: &str, response: reqwest::blocking::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<Value>()
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_default();
        bail!("notion API returned {status} for {url}: {detail}");
    }
    response
        .json()
        .with_context(|| format!("invalid JSON from {url}"))
}

fn results(response: &Value) -> &[Value] {
    response
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Continuation cursor, present only while the API reports more pages.
fn next_cursor(response: &Value) -> Option<String> {
    if !response
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return None;
    }
    response
        .get("next_cursor")
        .and_then(Value::as_str)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cursor_states() {
        // more-pages -> more-pages
        let more = json!({"has_more": true, "next_cursor": "abc"});
        assert_eq!(next_cursor(&more), Some("abc".into()));

        // more-pages -> done
        let done = json!({"has_more": false, "next_cursor": null});
        assert_eq!(next_cursor(&done), None);

        // Missing or inconsistent flag terminates the loop
        assert_eq!(next_cursor(&json!({})), None);
        assert_eq!(next_cursor(&json!({"has_more": true})), None);
    }

    #[test]
    fn test_results_missing() {
        assert!(results(&json!({})).is_empty());
        assert_eq!(results(&json!({"results": [1, 2]})).len(), 2);
    }
}
