use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_BASE_URL: &str = "https://www.cvk.gov.ua/pls/vm2020/";
pub const DEFAULT_CANDIDATES_URL: &str =
    "https://www.cvk.gov.ua/pls/vm2020/pvm008pt001f01=695pt00_t001f01=695.html";
pub const DEFAULT_WINNERS_URL: &str =
    "https://www.cvk.gov.ua/pls/vm2020/pvm002pt001f01=695pt00_t001f01=695.html";

const DEFAULT_REGIONS: [&str; 3] = ["Вінницька", "Волинська", "Дніпропетровська"];

#[derive(Parser, Debug)]
#[command(
    name = "cvk2020",
    version,
    about = "Harvesting and reconciliation tooling for the 2020 local-election results on cvk.gov.ua"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Harvest(HarvestArgs),
    Reconcile(ReconcileArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct HarvestArgs {
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Region-name fragment matched against the top-level pages. Repeatable.
    #[arg(long = "region", value_name = "FRAGMENT", default_values_t = DEFAULT_REGIONS.map(String::from))]
    pub regions: Vec<String>,

    #[arg(long, default_value = DEFAULT_CANDIDATES_URL)]
    pub candidates_url: String,

    #[arg(long, default_value = DEFAULT_WINNERS_URL)]
    pub winners_url: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// 1-based column holding the region link on the candidates page.
    #[arg(long, default_value_t = 4)]
    pub candidates_column: usize,

    /// 1-based column holding the region link on the winners page.
    #[arg(long, default_value_t = 7)]
    pub winners_column: usize,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReconcileArgs {
    #[arg(long, default_value = "output/candidates.csv")]
    pub candidates_csv: PathBuf,

    #[arg(long, default_value = "output/winners.csv")]
    pub winners_csv: PathBuf,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,
}
