use anyhow::{Context, Result};
use chrono::Utc;
use scraper::Html;
use tracing::{debug, info};

use crate::cli::HarvestArgs;
use crate::commands::reconcile::join::{STATUS_COLUMN, STATUS_NOT_ELECTED, outer_join};
use crate::commands::reconcile::stats::{party_stats, sort_by_elected_desc};
use crate::export::write_csv;
use crate::fetch::Fetcher;
use crate::model::{HarvestCounts, HarvestPaths, HarvestRunManifest};
use crate::table::RecordSet;
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

use super::councils::index_councils;
use super::extract::extract_council_table;
use super::normalize::RecordNormalizer;
use super::regions::resolve_region_links;

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: HarvestArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_dir = args.output_dir.clone();
    let manifest_dir = output_dir.join("manifests");
    ensure_directory(&manifest_dir)?;
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!("harvest_run_{}.json", utc_compact_string(started_ts)))
    });

    info!(run_id = %run_id, output_dir = %output_dir.display(), "starting harvest");

    let normalizer = RecordNormalizer::new().context("failed to compile normalizer patterns")?;
    let mut fetcher = Fetcher::new()?;

    info!(url = %args.candidates_url, column = args.candidates_column, "harvesting candidates dataset");
    let candidates = harvest_dataset(
        &mut fetcher,
        &normalizer,
        &args.candidates_url,
        &args.regions,
        args.candidates_column,
        &args.base_url,
    )?;

    info!(url = %args.winners_url, column = args.winners_column, "harvesting winners dataset");
    let winners = harvest_dataset(
        &mut fetcher,
        &normalizer,
        &args.winners_url,
        &args.regions,
        args.winners_column,
        &args.base_url,
    )?;

    info!(
        candidates = candidates.records.len(),
        winners = winners.records.len(),
        "datasets assembled, reconciling"
    );

    let merged = outer_join(&candidates.records, &winners.records)?;
    let mut stats = party_stats(&merged);
    sort_by_elected_desc(&mut stats);

    let candidates_path = output_dir.join("candidates.csv");
    let winners_path = output_dir.join("winners.csv");
    let merged_path = output_dir.join("merged.csv");
    let stats_path = output_dir.join("stats.csv");

    write_csv(&candidates.records, &candidates_path)?;
    write_csv(&winners.records, &winners_path)?;
    write_csv(&merged, &merged_path)?;
    write_csv(&stats, &stats_path)?;

    let not_elected_rows = merged
        .rows()
        .iter()
        .filter(|row| {
            row.get(STATUS_COLUMN)
                .is_some_and(|status| status == STATUS_NOT_ELECTED)
        })
        .count();
    let elected_rows = merged.len() - not_elected_rows;

    let manifest = HarvestRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_harvest_command(&args),
        paths: HarvestPaths {
            output_dir: output_dir.display().to_string(),
            candidates_csv: candidates_path.display().to_string(),
            winners_csv: winners_path.display().to_string(),
            merged_csv: merged_path.display().to_string(),
            stats_csv: stats_path.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        counts: HarvestCounts {
            regions_requested: args.regions.len(),
            candidate_councils: candidates.council_count,
            winner_councils: winners.council_count,
            candidate_rows: candidates.records.len(),
            winner_rows: winners.records.len(),
            reconciled_rows: merged.len(),
            elected_rows,
            not_elected_rows,
            party_groups: stats.len(),
            pages_fetched: fetcher.page_count(),
        },
        source_pages: fetcher.into_provenance(),
        warnings: Vec::new(),
        notes: vec![
            "Party labels are attributed from row-position intervals, not a source column."
                .to_string(),
            "Winner rows without a candidate match are counted as elected.".to_string(),
        ],
    };

    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote harvest run manifest");
    info!(reconciled = merged.len(), groups = stats.len(), "harvest completed");

    Ok(())
}

struct HarvestedDataset {
    records: RecordSet,
    council_count: usize,
}

/// One dataset end to end: top-level page → region links → council index →
/// per-council tables, normalized and concatenated in document order.
fn harvest_dataset(
    fetcher: &mut Fetcher,
    normalizer: &RecordNormalizer,
    url: &str,
    regions: &[String],
    column: usize,
    base_url: &str,
) -> Result<HarvestedDataset> {
    let top_page = fetcher.fetch(url)?;
    let region_links = {
        let document = Html::parse_document(&top_page);
        resolve_region_links(&document, regions, column, base_url)?
    };

    let council_index = index_councils(fetcher, &region_links, base_url)?;

    let mut records = RecordSet::new();
    let mut council_count = 0;
    for (region, councils) in &council_index {
        for (council, table_url) in councils {
            let body = fetcher.fetch(table_url)?;
            let table = extract_council_table(&body, table_url, region, council)?;
            let party_count = table.party_count();
            let mut table_records = table.into_records();
            normalizer.normalize(&mut table_records)?;
            debug!(
                region = %region,
                council = %council,
                rows = table_records.len(),
                parties = party_count,
                "extracted council table"
            );
            records.append(table_records);
            council_count += 1;
        }
    }

    Ok(HarvestedDataset {
        records,
        council_count,
    })
}

fn render_harvest_command(args: &HarvestArgs) -> String {
    let mut parts = vec!["cvk2020".to_string(), "harvest".to_string()];
    parts.push(format!("--output-dir {}", args.output_dir.display()));
    for region in &args.regions {
        parts.push(format!("--region {region}"));
    }
    parts.push(format!("--candidates-column {}", args.candidates_column));
    parts.push(format!("--winners-column {}", args.winners_column));
    parts.join(" ")
}
