#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crime statistics dashboard.
//!
//! Each subcommand loads a dataset (the bundled Maharashtra data unless
//! `--file` is given), applies the `--year` / `--category` filter, and prints
//! one view as text or JSON. Without a subcommand an interactive `dialoguer`
//! session is started.
//!
//! Logging goes through [`crime_stats_cli_utils::init_logger`], so set
//! `RUST_LOG=debug` to see per-stage pipeline counts.

mod interactive;
mod markers;
mod render;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use crime_stats_cli_utils::{IndicatifProgress, MultiProgress};
use crime_stats_dashboard::{DashboardSession, DashboardSnapshot};
use crime_stats_dataset_models::{FilterSpec, Selection};
use crime_stats_geography::DistrictTable;
use crime_stats_ingest::{Dataset, IngestConfig, IngestError};

#[derive(Parser)]
#[command(name = "crime_stats", about = "Crime statistics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grand, per-category, per-year, and per-region totals plus top locations
    Summary(ViewArgs),
    /// Category x location heatmap
    Matrix(ViewArgs),
    /// Per-district intensity markers
    Map(ViewArgs),
    /// Total, average, and max per category
    Stats(ViewArgs),
    /// Browse the dashboard interactively
    Interactive(DataArgs),
}

#[derive(Args, Default)]
struct DataArgs {
    /// Spreadsheet (.xlsx, .xls, .ods) or delimited text (.csv, .tsv) to load
    /// instead of the bundled dataset
    #[arg(long)]
    file: Option<PathBuf>,
    /// District table TOML (`[[districts]]` with name/lat/lng/region)
    /// replacing the built-in Maharashtra table
    #[arg(long)]
    districts: Option<PathBuf>,
}

#[derive(Args)]
struct ViewArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Year to show, or "all"
    #[arg(long, default_value = "all")]
    year: String,
    /// Crime category to show (exact header name), or "all"
    #[arg(long, default_value = "all")]
    category: String,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn filter(&self) -> FilterSpec {
        FilterSpec::new(Selection::parse(&self.year), Selection::parse(&self.category))
    }
}

/// Which view a subcommand prints.
#[derive(Clone, Copy)]
enum View {
    Summary,
    Matrix,
    Map,
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_stats_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = IngestConfig::from_env();

    let (view, args) = match cli.command {
        None => return interactive::run(&multi, &config, &DataArgs::default()).await,
        Some(Commands::Interactive(data)) => {
            return interactive::run(&multi, &config, &data).await;
        }
        Some(Commands::Summary(args)) => (View::Summary, args),
        Some(Commands::Matrix(args)) => (View::Matrix, args),
        Some(Commands::Map(args)) => (View::Map, args),
        Some(Commands::Stats(args)) => (View::Stats, args),
    };

    let districts = load_districts(args.data.districts.as_deref())?;
    let mut session = DashboardSession::with_bundled()?;
    if let Some(path) = &args.data.file {
        let result = load_upload(&multi, path, &config).await;
        if !session.install(result) {
            let message = session
                .notice()
                .map_or_else(|| "upload failed".to_string(), |n| n.message.clone());
            log::warn!("Rejected {}: {message}", path.display());
            return Err(message.into());
        }
    }
    session.set_filter(args.filter());
    log::debug!(
        "Rendering view with year={} category={}",
        session.filter().year(),
        session.filter().crime_category()
    );

    let snapshot = session.snapshot(&districts);
    print_view(view, &snapshot, args.json)?;

    Ok(())
}

fn print_view(
    view: View,
    snapshot: &DashboardSnapshot,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let value = match view {
            View::Summary => serde_json::to_value(snapshot)?,
            View::Matrix => serde_json::json!({
                "matrix": snapshot.matrix,
                "summary": snapshot.heatmap,
            }),
            View::Map => serde_json::to_value(&snapshot.geo_points)?,
            View::Stats => serde_json::to_value(&snapshot.category_stats)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let text = match view {
        View::Summary => render::format_summary(snapshot),
        View::Matrix => render::format_matrix(&snapshot.matrix, &snapshot.heatmap),
        View::Map => render::format_markers(&snapshot.geo_points),
        View::Stats => render::format_stats(&snapshot.category_stats),
    };
    print!("{text}");
    println!("\n{}", snapshot.result_summary());

    Ok(())
}

/// Loads the district table from `path`, or the built-in one.
fn load_districts(
    path: Option<&Path>,
) -> Result<DistrictTable, crime_stats_geography::GeographyError> {
    path.map_or_else(
        || Ok(crime_stats_geography::default_district_table()),
        crime_stats_geography::load_district_table,
    )
}

/// Reads and ingests one upload behind a progress bar.
async fn load_upload(
    multi: &MultiProgress,
    path: &Path,
    config: &IngestConfig,
) -> Result<Dataset, IngestError> {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let progress = IndicatifProgress::upload_bar(multi, &name);
    crime_stats_ingest::load_path(path, config, progress).await
}
