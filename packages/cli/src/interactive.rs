#![allow(clippy::module_name_repetitions)]

//! Interactive dashboard driven by `dialoguer` menus.
//!
//! Mirrors the web dashboard's controls: year and category filters, a reset
//! button, file upload with dismissible error notices, and the three views.

use std::path::PathBuf;

use crime_stats_cli_utils::MultiProgress;
use crime_stats_dashboard::DashboardSession;
use crime_stats_dataset_models::{Selection, filter::ALL};
use crime_stats_geography::DistrictTable;
use crime_stats_ingest::{IngestConfig, format_file_size};
use dialoguer::{Input, Select};

use crate::markers::MarkerPresenter;
use crate::{DataArgs, load_districts, load_upload, render};

/// Top-level actions of the interactive dashboard.
enum Action {
    Summary,
    Heatmap,
    Map,
    Statistics,
    FilterYear,
    FilterCategory,
    ResetFilters,
    Upload,
    DismissNotice,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Summary,
        Self::Heatmap,
        Self::Map,
        Self::Statistics,
        Self::FilterYear,
        Self::FilterCategory,
        Self::ResetFilters,
        Self::Upload,
        Self::DismissNotice,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Show summary",
            Self::Heatmap => "Show heatmap",
            Self::Map => "Show district map",
            Self::Statistics => "Show statistics",
            Self::FilterYear => "Filter by year",
            Self::FilterCategory => "Filter by crime category",
            Self::ResetFilters => "Reset filters",
            Self::Upload => "Upload a dataset",
            Self::DismissNotice => "Dismiss upload notice",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if the district table or bundled dataset cannot be
/// loaded, or a terminal prompt fails. Upload failures are reported as
/// notices and never end the loop.
pub async fn run(
    multi: &MultiProgress,
    config: &IngestConfig,
    args: &DataArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let districts = load_districts(args.districts.as_deref())?;
    let mut session = DashboardSession::with_bundled()?;
    if let Some(path) = &args.file {
        upload(&mut session, multi, config, path.clone()).await;
    }

    println!("Crime Statistics Dashboard");
    println!("Uploads up to {}", format_file_size(config.max_upload_bytes));

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        show_status(&session);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Summary => {
                print!("{}", render::format_summary(&session.snapshot(&districts)));
            }
            Action::Heatmap => {
                let snapshot = session.snapshot(&districts);
                print!("{}", render::format_matrix(&snapshot.matrix, &snapshot.heatmap));
            }
            Action::Map => show_map(&session, &districts)?,
            Action::Statistics => {
                print!(
                    "{}",
                    render::format_stats(&session.snapshot(&districts).category_stats)
                );
            }
            Action::FilterYear => pick_year(&mut session)?,
            Action::FilterCategory => pick_category(&mut session)?,
            Action::ResetFilters => session.reset_filter(),
            Action::Upload => {
                let input: String = Input::new()
                    .with_prompt("Path to .csv, .tsv, .xlsx, .xls or .ods file")
                    .interact_text()?;
                let trimmed = input.trim();
                if !trimmed.is_empty() {
                    upload(&mut session, multi, config, PathBuf::from(trimmed)).await;
                }
            }
            Action::DismissNotice => session.dismiss_notice(),
            Action::Quit => break,
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Prints the active dataset, filter, and any pending upload notice.
fn show_status(session: &DashboardSession) {
    let dataset = session.dataset();
    println!(
        "[{}] {} records | year={} category={}",
        dataset.source_name,
        dataset.records.len(),
        session.filter().year(),
        session.filter().crime_category()
    );
    if let Some(notice) = session.notice() {
        println!("! Upload failed ({}): {}", notice.kind, notice.message);
    }
}

async fn upload(
    session: &mut DashboardSession,
    multi: &MultiProgress,
    config: &IngestConfig,
    path: PathBuf,
) {
    session.dismiss_notice();
    let result = load_upload(multi, &path, config).await;
    if session.install(result) {
        println!(
            "Loaded {} ({} records). Filters were reset.",
            session.dataset().source_name,
            session.dataset().records.len()
        );
    }
}

fn show_map(
    session: &DashboardSession,
    districts: &DistrictTable,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = session.snapshot(districts);
    let categories = session.dataset().records.categories();

    MarkerPresenter::new("Select a district for details").present(
        &snapshot.geo_points,
        |point| {
            let records = session.district_records(&point.location_id);
            print!(
                "{}",
                render::format_district_records(point, categories, &records)
            );
        },
    )?;

    Ok(())
}

fn pick_year(session: &mut DashboardSession) -> Result<(), Box<dyn std::error::Error>> {
    let years = crime_stats_analytics::available_years(&session.dataset().records);
    let mut options = vec![ALL.to_string()];
    options.extend(years.iter().map(ToString::to_string));

    let idx = Select::new()
        .with_prompt("Year")
        .items(&options)
        .default(0)
        .interact()?;

    let filter = session.filter().with_year(selection_at(&options, idx));
    session.set_filter(filter);
    Ok(())
}

fn pick_category(session: &mut DashboardSession) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = vec![ALL.to_string()];
    options.extend(session.dataset().records.categories().iter().cloned());

    let idx = Select::new()
        .with_prompt("Crime category")
        .items(&options)
        .default(0)
        .max_length(15)
        .interact()?;

    let filter = session
        .filter()
        .with_crime_category(selection_at(&options, idx));
    session.set_filter(filter);
    Ok(())
}

/// The first option is always the wildcard, so a header literally named
/// `all` is still selectable on its own.
fn selection_at(options: &[String], idx: usize) -> Selection {
    if idx == 0 {
        Selection::All
    } else {
        Selection::Only(options[idx].clone())
    }
}
