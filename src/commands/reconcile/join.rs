use std::collections::HashMap;

use crate::error::HarvestError;
use crate::table::{Record, RecordSet};

pub(crate) const STATUS_COLUMN: &str = "статус";
pub(crate) const STATUS_ELECTED: &str = "обрано";
pub(crate) const STATUS_NOT_ELECTED: &str = "не обрано";

/// Composite key matching a candidate row to a winner row.
pub(crate) const JOIN_KEY_COLUMNS: [&str; 6] = [
    "ПІБ",
    "Дата народження",
    "Партія",
    "№ ТВО, за яким закріплено",
    "Регіон",
    "Рада",
];

fn join_key(record: &Record) -> Vec<String> {
    JOIN_KEY_COLUMNS
        .iter()
        .map(|column| record.get(*column).cloned().unwrap_or_default())
        .collect()
}

/// Outer join of the candidates and winners record sets on the composite
/// key. Candidates may repeat a key; winners must not (many-to-one).
///
/// Status: matched rows and winner-only rows are elected, unmatched
/// candidate rows are not. Winner rows with no candidate match usually mean
/// name or date formatting drift in the source; they are kept, not dropped.
/// No row of either input is lost.
pub(crate) fn outer_join(
    candidates: &RecordSet,
    winners: &RecordSet,
) -> Result<RecordSet, HarvestError> {
    let mut winner_by_key: HashMap<Vec<String>, usize> = HashMap::with_capacity(winners.len());
    for (index, row) in winners.rows().iter().enumerate() {
        let key = join_key(row);
        if winner_by_key.insert(key.clone(), index).is_some() {
            return Err(HarvestError::JoinCardinalityViolation {
                key: key.join(" | "),
            });
        }
    }

    let mut joined = RecordSet::with_columns(
        candidates
            .columns()
            .chain(winners.columns())
            .map(str::to_string)
            .chain([STATUS_COLUMN.to_string()]),
    );

    let mut winner_matched = vec![false; winners.len()];
    for row in candidates.rows() {
        let mut merged = row.clone();
        let status = match winner_by_key.get(&join_key(row)) {
            Some(&index) => {
                winner_matched[index] = true;
                for (column, value) in &winners.rows()[index] {
                    let slot = merged.entry(column.clone()).or_default();
                    if slot.is_empty() {
                        *slot = value.clone();
                    }
                }
                STATUS_ELECTED
            }
            None => STATUS_NOT_ELECTED,
        };
        merged.insert(STATUS_COLUMN.to_string(), status.to_string());
        joined.push(merged);
    }

    for (index, row) in winners.rows().iter().enumerate() {
        if winner_matched[index] {
            continue;
        }
        let mut merged = row.clone();
        merged.insert(STATUS_COLUMN.to_string(), STATUS_ELECTED.to_string());
        joined.push(merged);
    }

    Ok(joined)
}
