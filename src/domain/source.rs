use std::fmt;

use serde::{Deserialize, Serialize};

/// Fetch/extract policy for a source.
///
/// Parsed from the config tags `markdown`, `hash-only` and `wayback`. Any
/// other tag is kept as [`ParserKind::Unrecognized`] so the check for that
/// source can report it instead of the whole config failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParserKind {
    /// Changelog-style markdown with version headings.
    Markdown,
    /// Unstructured page; only a content fingerprint is tracked.
    HashOnly,
    /// Closest Wayback Machine snapshot of the page.
    Wayback,
    Unrecognized(String),
}

impl ParserKind {
    pub fn as_str(&self) -> &str {
        match self {
            ParserKind::Markdown => "markdown",
            ParserKind::HashOnly => "hash-only",
            ParserKind::Wayback => "wayback",
            ParserKind::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for ParserKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "markdown" => ParserKind::Markdown,
            "hash-only" => ParserKind::HashOnly,
            "wayback" => ParserKind::Wayback,
            _ => ParserKind::Unrecognized(tag),
        }
    }
}

impl From<ParserKind> for String {
    fn from(kind: ParserKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    pub url: String,
    pub parser: ParserKind,
    /// Human-facing page where the changes can be read.
    pub release_page_url: String,
    /// Prefer `main`/`article` over `body` when normalizing HTML.
    #[serde(default)]
    pub prefer_main_content: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl SourceDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        parser: ParserKind,
    ) -> Self {
        let url = url.into();
        Self {
            id: id.into(),
            name: name.into(),
            release_page_url: url.clone(),
            url,
            parser,
            prefer_main_content: false,
            webhook_url: None,
        }
    }

    pub fn with_release_page(mut self, url: impl Into<String>) -> Self {
        self.release_page_url = url.into();
        self
    }

    pub fn with_main_content(mut self) -> Self {
        self.prefer_main_content = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_kind_from_known_tags() {
        assert_eq!(ParserKind::from("markdown".to_string()), ParserKind::Markdown);
        assert_eq!(ParserKind::from("hash-only".to_string()), ParserKind::HashOnly);
        assert_eq!(ParserKind::from("wayback".to_string()), ParserKind::Wayback);
    }

    #[test]
    fn test_parser_kind_keeps_unknown_tag() {
        let kind = ParserKind::from("rss".to_string());
        assert_eq!(kind, ParserKind::Unrecognized("rss".into()));
        assert_eq!(kind.to_string(), "rss");
    }

    #[test]
    fn test_release_page_defaults_to_url() {
        let source = SourceDescriptor::new("a", "A", "https://example.com/notes", ParserKind::HashOnly);
        assert_eq!(source.release_page_url, "https://example.com/notes");
        assert!(!source.prefer_main_content);

        let source = source.with_release_page("https://example.com/view");
        assert_eq!(source.release_page_url, "https://example.com/view");
    }
}
