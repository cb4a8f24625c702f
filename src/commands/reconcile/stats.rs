use indexmap::IndexMap;

use crate::table::{Record, RecordSet};

use super::join::{STATUS_COLUMN, STATUS_NOT_ELECTED};

pub(crate) const TOTAL_COLUMN: &str = "Кандидатів";
pub(crate) const ELECTED_COLUMN: &str = "Обрано";

const GROUP_COLUMNS: [&str; 3] = ["Партія", "Регіон", "Рада"];

/// Per-(party, region, council) totals, in first-seen group order.
/// elected = total − not-elected, saturating at zero.
pub(crate) fn party_stats(reconciled: &RecordSet) -> RecordSet {
    let mut groups: IndexMap<Vec<String>, (usize, usize)> = IndexMap::new();
    for row in reconciled.rows() {
        let key: Vec<String> = GROUP_COLUMNS
            .iter()
            .map(|column| row.get(*column).cloned().unwrap_or_default())
            .collect();
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if row
            .get(STATUS_COLUMN)
            .is_some_and(|status| status == STATUS_NOT_ELECTED)
        {
            entry.1 += 1;
        }
    }

    let mut stats = RecordSet::with_columns(
        GROUP_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain([TOTAL_COLUMN.to_string(), ELECTED_COLUMN.to_string()]),
    );
    for (key, (total, not_elected)) in groups {
        let mut record = Record::new();
        for (column, value) in GROUP_COLUMNS.iter().zip(key) {
            record.insert(column.to_string(), value);
        }
        record.insert(TOTAL_COLUMN.to_string(), total.to_string());
        record.insert(
            ELECTED_COLUMN.to_string(),
            total.saturating_sub(not_elected).to_string(),
        );
        stats.push(record);
    }

    stats
}

/// Presentation order for the stats artifact: elected count descending.
pub(crate) fn sort_by_elected_desc(stats: &mut RecordSet) {
    let elected = |record: &Record| {
        record
            .get(ELECTED_COLUMN)
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0)
    };
    stats.sort_rows_by(|a, b| elected(b).cmp(&elected(a)));
}
