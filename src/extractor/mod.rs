//! Version extraction from changelog-style markdown.
//!
//! The newest release is assumed to be the first heading that looks like
//! `## [1.2.3]` or `# 1.2.3-beta.1`. Everything from that heading up to (but
//! not including) the next version heading is that release's change block.

use std::sync::LazyLock;

use regex::Regex;

pub const UNKNOWN_VERSION: &str = "Unknown";

/// Cap on the fallback summary when no version heading exists.
pub const FALLBACK_SUMMARY_CHARS: usize = 1000;

static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#+\s*\[?(\d+\.\d+\.\d+[^\]]*)\]?").expect("version heading pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBlock {
    pub version: String,
    pub changes: String,
}

pub fn extract_markdown_version(content: &str) -> VersionBlock {
    let mut version: Option<String> = None;
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines() {
        if let Some(captures) = VERSION_HEADING.captures(line) {
            if version.is_some() {
                break;
            }
            version = Some(captures[1].to_string());
            block.push(line);
        } else if version.is_some() {
            block.push(line);
        }
    }

    let changes = block.join("\n").trim().to_string();

    match version {
        Some(version) if !changes.is_empty() => VersionBlock { version, changes },
        version => VersionBlock {
            version: version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            changes: truncate_chars(content, FALLBACK_SUMMARY_CHARS),
        },
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
