use indexmap::IndexMap;
use scraper::{Html, Selector};
use tracing::info;

use crate::error::HarvestError;
use crate::fetch::{Fetcher, join_url};

use super::element_text;
use super::regions::RegionLink;

/// region → (council → table URL), both levels in source-page order.
pub(crate) type CouncilIndex = IndexMap<String, IndexMap<String, String>>;

/// Fetch each region page and map its councils to their table URLs.
pub(crate) fn index_councils(
    fetcher: &mut Fetcher,
    regions: &[RegionLink],
    base_url: &str,
) -> Result<CouncilIndex, HarvestError> {
    let mut index = CouncilIndex::new();
    for link in regions {
        let body = fetcher.fetch(&link.url)?;
        let document = Html::parse_document(&body);
        let councils = councils_on_page(&document, &link.url, base_url)?;
        info!(region = %link.region, councils = councils.len(), "indexed region");
        index.insert(link.region.clone(), councils);
    }
    Ok(index)
}

/// Read the council listing from the third table on a region page. The
/// council name is the portion of the anchor text after the final comma.
/// Rows without an anchor in their first cell are section headers or blank
/// separators and are skipped.
pub(crate) fn councils_on_page(
    document: &Html,
    url: &str,
    base_url: &str,
) -> Result<IndexMap<String, String>, HarvestError> {
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let table = document
        .select(&table_selector)
        .nth(2)
        .ok_or_else(|| HarvestError::TableNotFound {
            url: url.to_string(),
            detail: "fewer than three tables on the region page".to_string(),
        })?;

    let mut councils = IndexMap::new();
    for row in table.select(&row_selector) {
        let Some(cell) = row.select(&cell_selector).next() else {
            continue;
        };
        let Some(anchor) = cell.select(&anchor_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let text = element_text(&anchor);
        let council = text.rsplit(',').next().unwrap_or_default().trim().to_string();
        councils.insert(council, join_url(base_url, href)?);
    }

    Ok(councils)
}
