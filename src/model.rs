use serde::{Deserialize, Serialize};

/// Provenance of one fetched page, recorded in the run manifest in
/// fetch order (which is document order for the sequential pipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageProvenance {
    pub url: String,
    pub byte_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestPaths {
    pub output_dir: String,
    pub candidates_csv: String,
    pub winners_csv: String,
    pub merged_csv: String,
    pub stats_csv: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestCounts {
    pub regions_requested: usize,
    pub candidate_councils: usize,
    pub winner_councils: usize,
    pub candidate_rows: usize,
    pub winner_rows: usize,
    pub reconciled_rows: usize,
    pub elected_rows: usize,
    pub not_elected_rows: usize,
    pub party_groups: usize,
    pub pages_fetched: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: HarvestPaths,
    pub counts: HarvestCounts,
    pub source_pages: Vec<PageProvenance>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}
