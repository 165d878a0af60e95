//! Supported site languages and how they are inferred from sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported site locale.
///
/// Inference priority (see [`Language::infer`]): filename suffix, then
/// explicit metadata field, then the default. Unknown values never error,
/// they fall through to the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    Ja,
}

impl Language {
    /// All supported locales, in sync order.
    pub const ALL: [Language; 2] = [Language::Zh, Language::Ja];

    /// Canonical language tag (used in URLs and store keys).
    pub const fn tag(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::Ja => "ja",
        }
    }

    /// Match a filename language suffix (e.g. the `ja` in `note.ja.md`).
    ///
    /// Exact match only, but common misspellings are accepted: vault
    /// authors write `.jp.md` about as often as `.ja.md`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "zh" => Some(Language::Zh),
            "ja" | "jp" => Some(Language::Ja),
            _ => None,
        }
    }

    /// Match an explicit metadata field, case-insensitively and
    /// alias-aware.
    pub fn from_field(field: &str) -> Option<Self> {
        match field.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "chinese" | "中文" => Some(Language::Zh),
            "ja" | "jp" | "jpn" | "japanese" | "日本語" => Some(Language::Ja),
            _ => None,
        }
    }

    /// Infer the language for a note: filename suffix beats the metadata
    /// field beats the default.
    pub fn infer(suffix: Option<&str>, field: Option<&str>) -> Self {
        suffix
            .and_then(Self::from_suffix)
            .or_else(|| field.and_then(Self::from_field))
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_field(s).ok_or_else(|| format!("unknown language: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_exact() {
        assert_eq!(Language::from_suffix("zh"), Some(Language::Zh));
        assert_eq!(Language::from_suffix("ja"), Some(Language::Ja));
        assert_eq!(Language::from_suffix("jp"), Some(Language::Ja));
        assert_eq!(Language::from_suffix("en"), None);
        assert_eq!(Language::from_suffix("ZH"), None); // suffix match is exact
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!(Language::from_field("JP"), Some(Language::Ja));
        assert_eq!(Language::from_field(" japanese "), Some(Language::Ja));
        assert_eq!(Language::from_field("中文"), Some(Language::Zh));
        assert_eq!(Language::from_field("klingon"), None);
    }

    #[test]
    fn test_infer_priority() {
        // Suffix wins over field
        assert_eq!(Language::infer(Some("ja"), Some("zh")), Language::Ja);
        // Unknown suffix falls through to field
        assert_eq!(Language::infer(Some("en"), Some("ja")), Language::Ja);
        // Unknown everything falls through to default
        assert_eq!(Language::infer(Some("en"), Some("fr")), Language::Zh);
        assert_eq!(Language::infer(None, None), Language::Zh);
    }

    #[test]
    fn test_serde_tags() {
        assert_eq!(serde_json::to_string(&Language::Ja).unwrap(), "\"ja\"");
        let lang: Language = serde_json::from_str("\"zh\"").unwrap();
        assert_eq!(lang, Language::Zh);
    }
}
