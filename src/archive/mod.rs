//! Wayback Machine snapshot lookup.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::app::Result;
use crate::fetcher::Fetcher;

pub const DEFAULT_AVAILABILITY_URL: &str = "https://archive.org/wayback/available";

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    #[serde(default)]
    available: bool,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    url: String,
}

/// Closest archived copy of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub url: String,
    /// Raw `YYYYMMDDhhmmss` timestamp as reported by the archive
    pub timestamp: String,
}

impl Snapshot {
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y%m%d%H%M%S")
            .ok()
            .map(|dt| dt.and_utc())
    }
}

pub struct WaybackClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    availability_url: String,
}

impl WaybackClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_endpoint(fetcher, DEFAULT_AVAILABILITY_URL)
    }

    pub fn with_endpoint(fetcher: Arc<dyn Fetcher + Send + Sync>, availability_url: &str) -> Self {
        Self {
            fetcher,
            availability_url: availability_url.to_string(),
        }
    }

    pub fn availability_query(&self, target: &str) -> Result<Url> {
        Ok(Url::parse_with_params(&self.availability_url, &[("url", target)])?)
    }

    /// Resolve the closest snapshot of `target`.
    ///
    /// `None` when the query is refused, the body is not the expected JSON,
    /// or the archive has no usable snapshot.
    pub async fn closest_snapshot(&self, target: &str) -> Result<Option<Snapshot>> {
        let query = self.availability_query(target)?;

        let Some(body) = self.fetcher.fetch(query.as_str()).await?.into_content() else {
            tracing::warn!("Wayback availability query for {} failed", target);
            return Ok(None);
        };

        let response: AvailabilityResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Unexpected Wayback availability response: {}", e);
                return Ok(None);
            }
        };

        match response.archived_snapshots.closest {
            Some(closest) if closest.available && !closest.url.is_empty() => Ok(Some(Snapshot {
                url: closest.url,
                timestamp: closest.timestamp,
            })),
            _ => {
                tracing::info!("No Wayback snapshot available for {}", target);
                Ok(None)
            }
        }
    }
}
