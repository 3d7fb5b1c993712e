use chrono::{Local, NaiveDate};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use territory_dashboard::config::AppConfig;
use territory_dashboard::error::AppError;
use territory_dashboard::territories::{
    build_dashboard, Category, CategoryCounts, CategoryVisibility, DashboardRequest,
    DashboardSnapshot, Selection, TerritoryDataset,
};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// State to include; repeat the flag or pass a comma-separated list
    #[arg(long = "state", value_delimiter = ',', required = true)]
    pub(crate) states: Vec<String>,
    /// Case-insensitive substring matched against city, state or representative
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Minimum population (defaults to TERRITORY_MIN_POPULATION)
    #[arg(long)]
    pub(crate) min_population: Option<u64>,
    /// Proximity threshold in miles (defaults to TERRITORY_PROXIMITY_MILES)
    #[arg(long)]
    pub(crate) proximity_miles: Option<f64>,
    /// Representative of the selected summary cell
    #[arg(long, requires = "category")]
    pub(crate) rep: Option<String>,
    /// Category of the selected summary cell
    #[arg(long, requires = "rep", value_parser = crate::infra::parse_category)]
    pub(crate) category: Option<Category>,
    /// Hide map markers for a category (key, label or colour)
    #[arg(long, value_parser = crate::infra::parse_category)]
    pub(crate) hide: Vec<Category>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the configured territory CSV path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Include every filtered territory in the output
    #[arg(long)]
    pub(crate) list_records: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RegionsArgs {
    /// Override the configured territory CSV path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ReportArgs {
        states,
        search,
        min_population,
        proximity_miles,
        rep,
        category,
        hide,
        today,
        data,
        list_records,
    } = args;

    let data_path = data.unwrap_or(config.dashboard.data_path);
    let dataset = TerritoryDataset::from_path(&data_path)?;

    let mut visibility = CategoryVisibility::default();
    for category in hide {
        visibility.hide(category);
    }

    let request = DashboardRequest {
        regions: states
            .into_iter()
            .map(|state| state.trim().to_string())
            .filter(|state| !state.is_empty())
            .collect(),
        search,
        min_population: min_population.unwrap_or(config.dashboard.min_population),
        proximity_miles: proximity_miles.unwrap_or(config.dashboard.proximity_miles),
        visibility,
        selection: rep
            .zip(category)
            .map(|(rep, category)| Selection::new(rep, category)),
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let snapshot = build_dashboard(&dataset, &request, today)?;

    let stdout = io::stdout();
    render_dashboard(&snapshot, list_records, stdout.lock())?;
    Ok(())
}

pub(crate) fn run_regions(args: RegionsArgs) -> Result<(), AppError> {
    let data_path = match args.data {
        Some(path) => path,
        None => AppConfig::load()?.dashboard.data_path,
    };
    let dataset = TerritoryDataset::from_path(&data_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for region in dataset.regions() {
        writeln!(out, "{region}")?;
    }
    Ok(())
}

pub(crate) fn render_dashboard<W: Write>(
    snapshot: &DashboardSnapshot,
    list_records: bool,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "Territory dashboard (evaluated {})", snapshot.today)?;
    writeln!(
        out,
        "States: {} | {} of {} territories match the filters",
        snapshot.regions.join(", "),
        snapshot.records.len(),
        snapshot.dataset_size
    )?;

    if let Some(selection) = &snapshot.selection {
        writeln!(
            out,
            "Selected cell: {} / {}",
            selection.representative,
            selection.category.label()
        )?;
    }

    writeln!(out, "\nRepresentative summary")?;
    if snapshot.summary.is_empty() {
        writeln!(out, "- no assigned territories in the selected states")?;
    } else {
        for row in &snapshot.summary.rows {
            writeln!(
                out,
                "- {}: {} | Total {}",
                row.representative,
                summary_cells(&row.counts),
                row.total
            )?;
        }
        let totals = &snapshot.summary.totals;
        writeln!(
            out,
            "= All representatives: {} | Total {}",
            summary_cells(&totals.counts),
            totals.total
        )?;
    }

    if snapshot.available.is_empty() {
        writeln!(out, "\nAvailable cities: none")?;
    } else {
        writeln!(out, "\nAvailable cities")?;
        for entry in &snapshot.available {
            let population = entry
                .record
                .population
                .map(|population| population.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(
                out,
                "- {}, {} (population {})",
                entry.record.city, entry.record.state, population
            )?;
        }
    }

    writeln!(
        out,
        "\nMap markers: {} ({} open cities)",
        snapshot.map.markers.len(),
        snapshot.map.available_city_count()
    )?;
    if let Some(center) = snapshot.map.center {
        writeln!(
            out,
            "Map centre: {:.4}, {:.4}",
            center.latitude, center.longitude
        )?;
    }
    for category in Category::ordered() {
        let count = snapshot
            .map
            .markers
            .iter()
            .filter(|marker| marker.category == category)
            .count();
        if count > 0 {
            writeln!(out, "- {} ({}): {}", category.label(), category.color(), count)?;
        }
    }

    if list_records {
        writeln!(out, "\nTerritories")?;
        for entry in &snapshot.records {
            writeln!(
                out,
                "- {}, {} | {} | rep {}",
                entry.record.city,
                entry.record.state,
                entry.category.label(),
                entry.representative().unwrap_or("Unassigned")
            )?;
        }
    }

    Ok(())
}

fn summary_cells(counts: &CategoryCounts) -> String {
    Category::assigned()
        .iter()
        .map(|category| format!("{} {}", category.label(), counts.get(*category)))
        .collect::<Vec<_>>()
        .join(" | ")
}
