use crate::app::Result;
use crate::domain::SourceDescriptor;
use crate::extractor::extract_markdown_version;
use crate::fetcher::Fetcher;
use crate::parser::ParsedContent;

/// The raw document is fingerprinted as-is.
pub(super) async fn parse(
    fetcher: &(dyn Fetcher + Send + Sync),
    source: &SourceDescriptor,
) -> Result<Option<ParsedContent>> {
    let Some(content) = fetcher.fetch(&source.url).await?.into_content() else {
        return Ok(None);
    };

    let block = extract_markdown_version(&content);
    tracing::debug!("{}: latest version heading {}", source.id, block.version);

    Ok(Some(ParsedContent {
        stable_content: content,
        version: block.version,
        changes: block.changes,
    }))
}
