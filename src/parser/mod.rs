//! Per-source fetch + parse strategies.
//!
//! Every strategy yields a [`ParsedContent`] or `None` when the content
//! could not be fetched. The dispatcher picks one from the source's
//! [`ParserKind`] and never touches the network for an unrecognized kind.

mod hash_only;
mod markdown;
mod wayback;

use std::sync::Arc;

use crate::app::{NotewatchError, Result};
use crate::archive::WaybackClient;
use crate::domain::{ParserKind, SourceDescriptor};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

pub const GENERIC_VERSION: &str = "Update detected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Only ever fingerprinted, never shown.
    pub stable_content: String,
    pub version: String,
    pub changes: String,
}

impl ParsedContent {
    /// Result for sources that can only say *that* something changed.
    pub fn generic(source: &SourceDescriptor, stable_content: String) -> Self {
        Self {
            stable_content,
            version: GENERIC_VERSION.to_string(),
            changes: format!(
                "{} release notes have been updated.\n\nCheck the latest changes here:\n{}",
                source.name, source.release_page_url
            ),
        }
    }
}

pub struct ParserSet {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    wayback: WaybackClient,
}

impl ParserSet {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, availability_url: &str) -> Self {
        let wayback = WaybackClient::with_endpoint(fetcher.clone(), availability_url);
        Self {
            fetcher,
            normalizer: Normalizer::new(),
            wayback,
        }
    }

    pub async fn parse(&self, source: &SourceDescriptor) -> Result<Option<ParsedContent>> {
        match &source.parser {
            ParserKind::Markdown => markdown::parse(self.fetcher.as_ref(), source).await,
            ParserKind::HashOnly => {
                hash_only::parse(self.fetcher.as_ref(), &self.normalizer, source).await
            }
            ParserKind::Wayback => {
                wayback::parse(self.fetcher.as_ref(), &self.wayback, &self.normalizer, source)
                    .await
            }
            ParserKind::Unrecognized(tag) => Err(NotewatchError::UnknownParser(tag.clone())),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::{NotewatchError, Result};
    use crate::fetcher::{FetchResult, Fetcher};

    /// Every fetch fails at the transport level.
    pub struct FailingFetcher {
        message: String,
        calls: AtomicUsize,
    }

    impl FailingFetcher {
        pub fn new(message: &str) -> Self {
            Self {
                message: message.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NotewatchError::Other(self.message.clone()))
        }
    }

    /// Serves canned bodies per URL and counts requests. Unknown URLs get a 404.
    #[derive(Default)]
    pub struct StubFetcher {
        pages: Mutex<HashMap<String, String>>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(self, url: &str, body: &str) -> Self {
            self.set_page(url, body);
            self
        }

        pub fn set_page(&self, url: &str, body: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(url.to_string(), body.to_string());
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match self.pages.lock().unwrap().get(url) {
                Some(body) => FetchResult::Content(body.clone()),
                None => FetchResult::NoContent { status: 404 },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubFetcher;
    use super::*;
    use crate::archive::DEFAULT_AVAILABILITY_URL;

    #[tokio::test]
    async fn test_unrecognized_parser_never_fetches() {
        let fetcher = Arc::new(StubFetcher::new());
        let parsers = ParserSet::new(fetcher.clone(), DEFAULT_AVAILABILITY_URL);
        let source = SourceDescriptor::new(
            "x",
            "X",
            "https://example.com",
            ParserKind::Unrecognized("rss".into()),
        );

        let err = parsers.parse(&source).await.unwrap_err();
        assert!(matches!(err, NotewatchError::UnknownParser(ref tag) if tag == "rss"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn test_generic_update_points_at_release_page() {
        let source = SourceDescriptor::new("gemini", "Gemini", "https://gemini.example/notes", ParserKind::HashOnly)
            .with_release_page("https://gemini.example/view");
        let parsed = ParsedContent::generic(&source, "text".into());

        assert_eq!(parsed.version, GENERIC_VERSION);
        assert_eq!(
            parsed.changes,
            "Gemini release notes have been updated.\n\nCheck the latest changes here:\nhttps://gemini.example/view"
        );
        assert_eq!(parsed.stable_content, "text");
    }
}
