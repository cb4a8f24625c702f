use scraper::{Html, Selector};

use crate::error::HarvestError;
use crate::fetch::join_url;

use super::element_text;

/// Suffix turning a requested fragment into the full region name.
const REGION_SUFFIX: &str = " область";

#[derive(Debug, Clone)]
pub(crate) struct RegionLink {
    pub region: String,
    pub url: String,
}

/// Locate each region's council-index link on a top-level page.
///
/// The fragment match is a case-sensitive substring test against cell text;
/// `column` is 1-based because the candidates and winners pages carry the
/// link in different columns (4 and 7).
pub(crate) fn resolve_region_links(
    document: &Html,
    fragments: &[String],
    column: usize,
    base_url: &str,
) -> Result<Vec<RegionLink>, HarvestError> {
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut links = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let row = document
            .select(&row_selector)
            .find(|row| {
                row.select(&cell_selector)
                    .any(|cell| element_text(&cell).contains(fragment.as_str()))
            })
            .ok_or_else(|| HarvestError::RegionNotFound {
                region: fragment.clone(),
            })?;

        let href = column
            .checked_sub(1)
            .and_then(|index| row.select(&cell_selector).nth(index))
            .and_then(|cell| cell.select(&anchor_selector).next())
            .and_then(|anchor| anchor.value().attr("href"))
            .ok_or_else(|| HarvestError::LinkMissing {
                region: fragment.clone(),
                column,
            })?;

        links.push(RegionLink {
            region: format!("{fragment}{REGION_SUFFIX}"),
            url: join_url(base_url, href)?,
        });
    }

    Ok(links)
}
