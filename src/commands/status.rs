use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::HarvestRunManifest;

const ARTIFACTS: [&str; 4] = ["candidates.csv", "winners.csv", "merged.csv", "stats.csv"];

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.output_dir.join("manifests");

    info!(output_dir = %args.output_dir.display(), "status requested");

    match latest_manifest_path(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: HarvestRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                updated_at = %manifest.updated_at,
                regions = manifest.counts.regions_requested,
                candidate_rows = manifest.counts.candidate_rows,
                winner_rows = manifest.counts.winner_rows,
                reconciled_rows = manifest.counts.reconciled_rows,
                elected_rows = manifest.counts.elected_rows,
                pages_fetched = manifest.counts.pages_fetched,
                "loaded harvest run manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no harvest run manifest found"),
    }

    for artifact in ARTIFACTS {
        let path = args.output_dir.join(artifact);
        if path.exists() {
            let rows = count_data_rows(&path)?;
            info!(artifact, rows, "artifact present");
        } else {
            warn!(artifact, "artifact missing");
        }
    }

    Ok(())
}

/// Run ids embed a compact UTC timestamp, so the lexicographically greatest
/// manifest file name is the newest run.
fn latest_manifest_path(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let mut latest: Option<PathBuf> = None;
    for entry in fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?
    {
        let path = entry
            .with_context(|| format!("failed to read {}", manifest_dir.display()))?
            .path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.starts_with("harvest_run_") || !name.ends_with(".json") {
            continue;
        }
        if latest
            .as_ref()
            .is_none_or(|current| current.as_os_str() < path.as_os_str())
        {
            latest = Some(path);
        }
    }

    Ok(latest)
}

fn count_data_rows(path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = 0;
    for record in reader.records() {
        record.with_context(|| format!("failed to read {}", path.display()))?;
        rows += 1;
    }

    Ok(rows)
}
