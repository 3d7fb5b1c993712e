pub mod classifier;
pub mod dashboard;
pub mod domain;
pub mod map;
pub mod proximity;
pub mod query;
pub mod store;
pub mod summary;

pub use classifier::{category_for, classify, reclassify};
pub use dashboard::{build_dashboard, DashboardError, DashboardRequest, DashboardSnapshot};
pub use domain::{Category, ClassifiedTerritory, Coordinates, TerritoryRecord};
pub use map::{build_map, CategoryVisibility, MapMarker, MapView, MarkerKind};
pub use proximity::{
    find_available, find_available_with, haversine_miles, LinearScan, ProximityIndex,
};
pub use query::{next_selection, Selection, TerritoryQuery};
pub use store::{DatasetCache, SourceFingerprint, StoreError, TerritoryDataset};
pub use summary::{
    summarize, CategoryCounts, RepresentativeRow, RepresentativeSummary, SummaryTotals,
};
