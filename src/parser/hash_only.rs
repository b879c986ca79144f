use crate::app::Result;
use crate::domain::SourceDescriptor;
use crate::fetcher::Fetcher;
use crate::normalizer::{ContentRegion, Normalizer};
use crate::parser::ParsedContent;

pub(super) async fn parse(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    source: &SourceDescriptor,
) -> Result<Option<ParsedContent>> {
    let Some(html) = fetcher.fetch(&source.url).await?.into_content() else {
        return Ok(None);
    };

    let region = ContentRegion::for_source(source.prefer_main_content);
    let stable_content = normalizer.stable_text(&html, region);

    Ok(Some(ParsedContent::generic(source, stable_content)))
}
