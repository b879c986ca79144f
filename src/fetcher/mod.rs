pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// 2xx response, body decoded as text
    Content(String),
    /// Server answered with a non-success status
    NoContent { status: u16 },
}

impl FetchResult {
    pub fn into_content(self) -> Option<String> {
        match self {
            FetchResult::Content(body) => Some(body),
            FetchResult::NoContent { .. } => None,
        }
    }
}

/// GET a URL as text.
///
/// Transport failures are `Err`; a reachable server that refuses the
/// request is [`FetchResult::NoContent`].
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult>;
}
