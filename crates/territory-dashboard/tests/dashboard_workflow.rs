use chrono::NaiveDate;
use std::path::PathBuf;
use territory_dashboard::error::AppError;
use territory_dashboard::territories::{
    build_dashboard, next_selection, Category, DashboardError, DashboardRequest, DatasetCache,
    MarkerKind, Selection, StoreError, TerritoryDataset,
};

const FIXTURE: &[u8] = include_bytes!("fixtures/territories.csv");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/territories.csv")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

fn dataset() -> TerritoryDataset {
    TerritoryDataset::from_reader(FIXTURE).expect("fixture parses")
}

fn cities<'a, I>(entries: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a territory_dashboard::territories::ClassifiedTerritory>,
{
    entries
        .into_iter()
        .map(|entry| entry.record.city.as_str())
        .collect()
}

#[test]
fn fixture_loads_messy_cells_as_absent_values() {
    let dataset = dataset();
    assert_eq!(dataset.len(), 15);
    assert_eq!(dataset.regions(), vec!["IA", "MO", "NE"]);

    let des_moines = &dataset.records()[0];
    assert_eq!(des_moines.population, Some(214_133));
    assert_eq!(des_moines.deal_count, 2);

    let cedar_rapids = &dataset.records()[1];
    assert_eq!(
        cedar_rapids.assigned_on,
        NaiveDate::from_ymd_opt(2024, 9, 15)
    );

    let ames = &dataset.records()[4];
    assert_eq!(ames.deal_count, 0);
    assert!(ames.assigned_on.is_none());

    let mystery = dataset
        .records()
        .iter()
        .find(|record| record.city == "Mystery Crossing")
        .expect("unlocated row kept");
    assert!(mystery.coordinates.is_none());
}

#[test]
fn iowa_dashboard_matches_the_expected_views() {
    let snapshot = build_dashboard(&dataset(), &DashboardRequest::for_regions(["IA"]), today())
        .expect("snapshot builds");

    // Tiny Town falls under the population floor.
    assert_eq!(snapshot.records.len(), 11);

    assert_eq!(
        cities(&snapshot.available),
        vec!["Ankeny", "Sioux City", "Iowa City", "Pella"]
    );

    let summary = &snapshot.summary;
    assert_eq!(summary.count("Jordan", Category::AssignedRecent), 1);
    assert_eq!(summary.count("Jordan", Category::AssignedAging), 1);
    assert_eq!(summary.count("Riley", Category::AssignedStaleNoDeals), 1);
    assert_eq!(summary.count("Riley", Category::AssignedOther), 1);
    assert_eq!(summary.count("Casey", Category::AssignedOther), 1);
    assert_eq!(summary.totals.total, 5);
    assert!(summary.row("Morgan").is_none());

    // Every located territory is drawn; four of them are open cities.
    assert_eq!(snapshot.map.markers.len(), 10);
    assert_eq!(snapshot.map.available_city_count(), 4);
    assert_eq!(
        snapshot
            .map
            .markers
            .iter()
            .filter(|marker| marker.color == "purple")
            .count(),
        5
    );
    let west_des_moines = snapshot
        .map
        .markers
        .iter()
        .find(|marker| marker.label.starts_with("West Des Moines"))
        .expect("territory near an assigned city keeps its marker");
    assert_eq!(west_des_moines.kind, MarkerKind::Territory);
}

#[test]
fn wider_threshold_shrinks_the_available_set() {
    let mut request = DashboardRequest::for_regions(["IA"]);
    request.proximity_miles = 25.0;
    let snapshot = build_dashboard(&dataset(), &request, today()).expect("snapshot builds");

    assert_eq!(cities(&snapshot.available), vec!["Sioux City", "Pella"]);
}

#[test]
fn zero_population_floor_admits_unknown_populations() {
    let mut request = DashboardRequest::for_regions(["IA"]);
    request.min_population = 0;
    let snapshot = build_dashboard(&dataset(), &request, today()).expect("snapshot builds");

    assert_eq!(snapshot.records.len(), 12);
    // Mystery Crossing has no coordinates, so it never qualifies as available.
    assert!(!cities(&snapshot.available).contains(&"Mystery Crossing"));
}

#[test]
fn summary_cell_click_cycle_narrows_and_restores_records() {
    let dataset = dataset();
    let mut request = DashboardRequest::for_regions(["IA", "NE"]);
    let cell = Selection::new("Casey", Category::AssignedOther);

    request.selection = next_selection(request.selection.as_ref(), cell.clone());
    let narrowed = build_dashboard(&dataset, &request, today()).expect("snapshot builds");
    assert_eq!(cities(&narrowed.records), vec!["Ames"]);

    request.selection = next_selection(request.selection.as_ref(), cell);
    assert!(request.selection.is_none());
    let restored = build_dashboard(&dataset, &request, today()).expect("snapshot builds");
    assert_eq!(restored.records.len(), 13);
}

#[test]
fn search_matches_representative_names() {
    let mut request = DashboardRequest::for_regions(["IA", "NE", "MO"]);
    request.search = "riley".to_string();
    let snapshot = build_dashboard(&dataset(), &request, today()).expect("snapshot builds");

    assert_eq!(cities(&snapshot.records), vec!["Davenport", "Waterloo"]);
}

#[test]
fn missing_region_selection_maps_to_unprocessable() {
    let error = build_dashboard(&dataset(), &DashboardRequest::default(), today())
        .expect_err("regions required");
    assert_eq!(error, DashboardError::RegionSelectionRequired);

    let app_error = AppError::from(error);
    assert_eq!(app_error.status().as_u16(), 422);
}

#[test]
fn cache_serves_the_fixture_until_reloaded() {
    let mut cache = DatasetCache::new();
    let first = cache.get_or_load(fixture_path()).expect("fixture loads");
    let second = cache.get_or_load(fixture_path()).expect("fixture cached");
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    let reloaded = cache.reload(fixture_path()).expect("fixture reloads");
    assert!(!std::sync::Arc::ptr_eq(&first, &reloaded));
    assert_eq!(reloaded.len(), first.len());
}

#[test]
fn missing_required_column_fails_the_load() {
    let csv = "City,State,Latitude\nDes Moines,IA,41.5868\n";
    let error = TerritoryDataset::from_reader(csv.as_bytes()).expect_err("longitude required");
    assert!(matches!(error, StoreError::Csv(_)));

    let app_error = AppError::from(error);
    assert_eq!(app_error.status().as_u16(), 400);
}
