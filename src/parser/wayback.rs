use crate::app::Result;
use crate::archive::WaybackClient;
use crate::domain::SourceDescriptor;
use crate::fetcher::Fetcher;
use crate::normalizer::{ContentRegion, Normalizer};
use crate::parser::ParsedContent;

/// Fingerprint the closest archived snapshot instead of the live page.
///
/// No snapshot means the check cannot be decided, so this yields `None`
/// rather than a synthetic "unchanged".
pub(super) async fn parse(
    fetcher: &(dyn Fetcher + Send + Sync),
    wayback: &WaybackClient,
    normalizer: &Normalizer,
    source: &SourceDescriptor,
) -> Result<Option<ParsedContent>> {
    let Some(snapshot) = wayback.closest_snapshot(&source.url).await? else {
        return Ok(None);
    };

    match snapshot.captured_at() {
        Some(at) => tracing::info!("{}: found Wayback snapshot from {}", source.id, at),
        None => tracing::info!("{}: found Wayback snapshot from {}", source.id, snapshot.timestamp),
    }

    let Some(html) = fetcher.fetch(&snapshot.url).await?.into_content() else {
        return Ok(None);
    };

    let region = ContentRegion::for_source(source.prefer_main_content);
    let stable_content = normalizer.stable_text(&html, region);

    Ok(Some(ParsedContent::generic(source, stable_content)))
}
