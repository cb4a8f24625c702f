use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ReconcileArgs;
use crate::export::{read_csv, write_csv};
use crate::table::RecordSet;
use crate::util::ensure_directory;

use super::join::{JOIN_KEY_COLUMNS, outer_join};
use super::stats::{party_stats, sort_by_elected_desc};

/// Re-run the join and statistics over previously harvested CSV artifacts,
/// without touching the network.
pub fn run(args: ReconcileArgs) -> Result<()> {
    ensure_directory(&args.output_dir)?;

    let candidates = read_csv(&args.candidates_csv)?;
    let winners = read_csv(&args.winners_csv)?;

    info!(
        candidates = candidates.len(),
        winners = winners.len(),
        "loaded harvested datasets"
    );

    check_join_columns("candidates", &candidates);
    check_join_columns("winners", &winners);

    let merged = outer_join(&candidates, &winners)?;
    let mut stats = party_stats(&merged);
    sort_by_elected_desc(&mut stats);

    let merged_path = args.output_dir.join("merged.csv");
    let stats_path = args.output_dir.join("stats.csv");
    write_csv(&merged, &merged_path)?;
    write_csv(&stats, &stats_path)?;

    info!(
        reconciled = merged.len(),
        groups = stats.len(),
        merged = %merged_path.display(),
        stats = %stats_path.display(),
        "reconcile completed"
    );

    Ok(())
}

/// Rows in a dataset that lacks a key column all join on the empty string.
fn check_join_columns(dataset: &str, records: &RecordSet) {
    if records.is_empty() {
        warn!(dataset, "dataset has no rows");
    }
    for column in JOIN_KEY_COLUMNS {
        if !records.has_column(column) {
            warn!(dataset, column, "dataset lacks a join key column");
        }
    }
}
