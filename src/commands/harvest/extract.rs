use scraper::{Html, Selector};

use crate::error::HarvestError;
use crate::table::{Record, RecordSet};

use super::element_text;

/// Header marker identifying the candidate/winner table on a council page.
pub(crate) const TABLE_MARKER: &str = "Відомості";
/// Lowercased substring marking a party-header row.
const PARTY_MARKER: &str = "партія";

pub(crate) const PARTY_COLUMN: &str = "Партія";
pub(crate) const REGION_COLUMN: &str = "Регіон";
pub(crate) const COUNCIL_COLUMN: &str = "Рада";

/// Ordered (boundary, label) pairs derived from party-header rows. Pair `k`
/// covers every candidate row with index strictly below boundary `k`; the
/// last label is the fallback for rows at or past the final boundary.
///
/// Built once per table, never re-derived per query.
#[derive(Debug, Clone)]
pub(crate) struct PartyIntervals {
    bounds: Vec<(usize, String)>,
}

impl PartyIntervals {
    pub fn new(boundaries: Vec<usize>, labels: Vec<String>) -> Self {
        Self {
            bounds: boundaries.into_iter().zip(labels).collect(),
        }
    }

    pub fn party_count(&self) -> usize {
        self.bounds.len()
    }

    pub fn label_for(&self, row_index: usize) -> Option<&str> {
        for (boundary, label) in &self.bounds {
            if row_index < *boundary {
                return Some(label);
            }
        }
        self.bounds.last().map(|(_, label)| label.as_str())
    }
}

/// A council table after extraction: grouped under party headers, or a flat
/// candidate list for councils that publish no party rows. The flat shape is
/// a recognized variant, not an error.
#[derive(Debug, Clone)]
pub(crate) enum CouncilTable {
    Grouped {
        intervals: PartyIntervals,
        records: RecordSet,
    },
    Flat {
        records: RecordSet,
    },
}

impl CouncilTable {
    pub fn party_count(&self) -> usize {
        match self {
            Self::Grouped { intervals, .. } => intervals.party_count(),
            Self::Flat { .. } => 0,
        }
    }

    pub fn into_records(self) -> RecordSet {
        match self {
            Self::Grouped { records, .. } | Self::Flat { records } => records,
        }
    }
}

/// Parse a council page and extract its marker-matched table, attributing a
/// party label to each candidate row from the row-position intervals and
/// tagging every record with region and council.
pub(crate) fn extract_council_table(
    html: &str,
    url: &str,
    region: &str,
    council: &str,
) -> Result<CouncilTable, HarvestError> {
    let document = Html::parse_document(html);
    let (header, rows) = marked_table_rows(&document, url)?;
    Ok(build_council_table(&header, rows, region, council))
}

/// Locate the table whose header row contains the marker; return its header
/// labels and the cell texts of every data row.
fn marked_table_rows(
    document: &Html,
    url: &str,
) -> Result<(Vec<String>, Vec<Vec<String>>), HarvestError> {
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();

    for table in document.select(&table_selector) {
        let mut rows = table.select(&row_selector);
        let Some(header_row) = rows.next() else {
            continue;
        };
        if !element_text(&header_row).contains(TABLE_MARKER) {
            continue;
        }

        let header: Vec<String> = header_row
            .select(&cell_selector)
            .map(|cell| element_text(&cell))
            .collect();
        let data = rows
            .map(|row| row.select(&cell_selector).map(|cell| element_text(&cell)).collect())
            .collect();
        return Ok((header, data));
    }

    Err(HarvestError::TableNotFound {
        url: url.to_string(),
        detail: format!("no table header containing '{TABLE_MARKER}'"),
    })
}

/// Partition data rows into party headers and candidates, then attribute
/// party labels. Row indices are 0-based over the data rows.
fn build_council_table(
    header: &[String],
    rows: Vec<Vec<String>>,
    region: &str,
    council: &str,
) -> CouncilTable {
    let row_count = rows.len();
    let mut party_rows: Vec<(usize, String)> = Vec::new();
    let mut candidate_rows: Vec<(usize, Vec<String>)> = Vec::new();

    for (index, cells) in rows.into_iter().enumerate() {
        let first = cells.first().map(String::as_str).unwrap_or_default();
        if first.to_lowercase().contains(PARTY_MARKER) {
            party_rows.push((index, first.to_string()));
        } else {
            candidate_rows.push((index, cells));
        }
    }

    let columns = header.iter().filter(|label| !label.is_empty()).cloned();

    if party_rows.is_empty() {
        let mut records = RecordSet::with_columns(columns);
        for (_, cells) in candidate_rows {
            records.push(tagged_record(header, cells, None, region, council));
        }
        return CouncilTable::Flat { records };
    }

    // Boundaries: every party-header index except the first, then the final
    // row index. Zipped in order with the party labels.
    let boundaries: Vec<usize> = party_rows
        .iter()
        .skip(1)
        .map(|(index, _)| *index)
        .chain([row_count - 1])
        .collect();
    let labels: Vec<String> = party_rows.iter().map(|(_, label)| label.clone()).collect();
    let intervals = PartyIntervals::new(boundaries, labels);

    let mut records = RecordSet::with_columns(columns);
    for (index, cells) in candidate_rows {
        let party = intervals.label_for(index).unwrap_or("").to_string();
        records.push(tagged_record(header, cells, Some(&party), region, council));
    }

    CouncilTable::Grouped { intervals, records }
}

fn tagged_record(
    header: &[String],
    cells: Vec<String>,
    party: Option<&str>,
    region: &str,
    council: &str,
) -> Record {
    let mut record = Record::new();
    for (column, value) in header.iter().zip(cells) {
        if !column.is_empty() && !value.is_empty() {
            record.insert(column.clone(), value);
        }
    }
    if let Some(party) = party {
        record.insert(PARTY_COLUMN.to_string(), party.to_string());
    }
    record.insert(REGION_COLUMN.to_string(), region.to_string());
    record.insert(COUNCIL_COLUMN.to_string(), council.to_string());
    record
}
