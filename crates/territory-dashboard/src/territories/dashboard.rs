use super::classifier::classify;
use super::domain::ClassifiedTerritory;
use super::map::{build_map, CategoryVisibility, MapView};
use super::proximity::{find_available_with, LinearScan, DEFAULT_THRESHOLD_MILES};
use super::query::{Selection, TerritoryQuery, DEFAULT_MIN_POPULATION};
use super::store::TerritoryDataset;
use super::summary::{summarize, RepresentativeSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

pub const REGION_SELECTION_WARNING: &str = "Please select at least one state to begin.";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DashboardError {
    #[error("{}", REGION_SELECTION_WARNING)]
    RegionSelectionRequired,
    #[error("proximity threshold must be a finite, non-negative number of miles (got {0})")]
    InvalidThreshold(f64),
}

/// Operator inputs for one dashboard pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub regions: BTreeSet<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_min_population")]
    pub min_population: u64,
    #[serde(default = "default_proximity_miles")]
    pub proximity_miles: f64,
    #[serde(default)]
    pub visibility: CategoryVisibility,
    #[serde(default)]
    pub selection: Option<Selection>,
}

fn default_min_population() -> u64 {
    DEFAULT_MIN_POPULATION
}

fn default_proximity_miles() -> f64 {
    DEFAULT_THRESHOLD_MILES
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            regions: BTreeSet::new(),
            search: String::new(),
            min_population: DEFAULT_MIN_POPULATION,
            proximity_miles: DEFAULT_THRESHOLD_MILES,
            visibility: CategoryVisibility::default(),
            selection: None,
        }
    }
}

impl DashboardRequest {
    pub fn for_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> TerritoryQuery {
        TerritoryQuery {
            regions: self.regions.clone(),
            search: self.search.clone(),
            min_population: self.min_population,
            ..TerritoryQuery::default()
        }
        .with_selection(self.selection.as_ref())
    }
}

/// Everything the presentation layer renders for one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub today: NaiveDate,
    pub regions: Vec<String>,
    pub dataset_size: usize,
    pub summary: RepresentativeSummary,
    pub records: Vec<ClassifiedTerritory>,
    pub available: Vec<ClassifiedTerritory>,
    pub map: MapView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

/// Runs classify -> summarize / filter -> proximity -> map over `dataset`.
///
/// The summary covers every territory in the selected regions; the record
/// list, available set and map honour the remaining filters.
pub fn build_dashboard(
    dataset: &TerritoryDataset,
    request: &DashboardRequest,
    today: NaiveDate,
) -> Result<DashboardSnapshot, DashboardError> {
    if request.regions.is_empty() {
        return Err(DashboardError::RegionSelectionRequired);
    }
    if !request.proximity_miles.is_finite() || request.proximity_miles < 0.0 {
        return Err(DashboardError::InvalidThreshold(request.proximity_miles));
    }

    let classified = classify(dataset.records().iter().cloned(), today);

    let summary = summarize(
        classified
            .iter()
            .filter(|entry| request.regions.contains(&entry.record.state)),
    );

    let filtered = request.query().filter(&classified);
    let index = LinearScan::from_assigned(filtered.iter().copied());
    let available = find_available_with(&index, filtered.iter().copied(), request.proximity_miles);
    let map = build_map(&filtered, &available, &request.visibility);

    debug!(
        dataset = dataset.len(),
        filtered = filtered.len(),
        assigned_points = index.len(),
        available = available.len(),
        markers = map.markers.len(),
        "dashboard built"
    );

    Ok(DashboardSnapshot {
        today,
        regions: request.regions.iter().cloned().collect(),
        dataset_size: dataset.len(),
        summary,
        records: filtered.into_iter().cloned().collect(),
        available: available.into_iter().cloned().collect(),
        map,
        selection: request.selection.clone(),
    })
}
