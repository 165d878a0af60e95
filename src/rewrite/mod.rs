//! Obsidian-to-site Markdown rewriting.
//!
//! Three source-specific syntaxes are handled:
//! - `[[Target]]` / `[[Target|Label]]` wiki links become site-relative
//!   Markdown links under `/<lang>/notes/<slug>`
//! - `![[path/image.png]]` embeds become image references under the site
//!   assets path, directory components stripped
//! - `%%...%%` inline comments are removed (non-greedy, multiple per doc)
//!
//! Pure text transformation, no I/O. Already-rewritten links no longer
//! match the wiki syntax, so reapplying is a no-op.

use regex::Regex;
use std::sync::LazyLock;

use crate::normalize::{Language, slugify};

/// Site path prefix for embedded images.
const ASSETS_PREFIX: &str = "/images";

/// `%%...%%` comments, non-greedy, may span lines.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)%%.*?%%").expect("valid regex"));

/// `![[embed]]` image embeds. Matched before wiki links so the leading
/// `!` is not left behind.
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("valid regex"));

/// `[[Target]]` or `[[Target|Label]]` wiki links.
static WIKI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("valid regex"));

/// Rewrite Obsidian syntax in a note body into site-relative Markdown.
pub fn rewrite_links(body: &str, lang: Language) -> String {
    let body = COMMENT_RE.replace_all(body, "");

    let body = EMBED_RE.replace_all(&body, |caps: &regex::Captures| {
        let target = caps[1].trim();
        // Directory components are vault-internal; only the base name
        // survives into the assets path.
        let base = target.rsplit('/').next().unwrap_or(target);
        format!("![]({ASSETS_PREFIX}/{base})")
    });

    let body = WIKI_RE.replace_all(&body, |caps: &regex::Captures| {
        let target = caps[1].trim();
        let label = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|l| !l.is_empty())
            .unwrap_or(target);
        format!("[{label}](/{}/notes/{})", lang.tag(), slugify(target))
    });

    body.into_owned()
}
