use chrono::{Duration, NaiveDate};
use territory_dashboard::territories::{
    category_for, classify, find_available, haversine_miles, reclassify, summarize, Category,
    ClassifiedTerritory, Coordinates, TerritoryQuery, TerritoryRecord,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

/// Point `miles` due north of `origin`; one degree of latitude is R * pi / 180 miles.
fn north_of(origin: Coordinates, miles: f64) -> Coordinates {
    let degrees = miles / (3958.8 * std::f64::consts::PI / 180.0);
    Coordinates::new(origin.latitude + degrees, origin.longitude)
}

fn origin() -> Coordinates {
    Coordinates::new(40.0, -75.0)
}

#[test]
fn recent_assignment_with_deals_is_recent() {
    let record = TerritoryRecord::new("Record A", "PA")
        .with_coordinates(40.0, -75.0)
        .with_assigned_on(days_ago(100))
        .with_deal_count(2)
        .with_representative("X");
    assert_eq!(category_for(&record, today()), Category::AssignedRecent);
}

#[test]
fn stale_assignment_without_deals_is_flagged() {
    let record = TerritoryRecord::new("Record B", "PA")
        .with_assigned_on(days_ago(300))
        .with_deal_count(0)
        .with_representative("Y");
    assert_eq!(
        category_for(&record, today()),
        Category::AssignedStaleNoDeals
    );
}

#[test]
fn stale_assignment_with_deals_is_other() {
    let record = TerritoryRecord::new("Record C", "PA")
        .with_assigned_on(days_ago(300))
        .with_deal_count(3)
        .with_representative("Z");
    assert_eq!(category_for(&record, today()), Category::AssignedOther);
}

#[test]
fn seven_to_nine_month_window_is_aging_regardless_of_deals() {
    for deals in [0, 3] {
        let record = TerritoryRecord::new("Record", "PA")
            .with_assigned_on(days_ago(250))
            .with_deal_count(deals)
            .with_representative("Y");
        assert_eq!(category_for(&record, today()), Category::AssignedAging);
    }
}

#[test]
fn representative_without_date_is_other() {
    let record = TerritoryRecord::new("Record D", "PA").with_representative("W");
    assert_eq!(category_for(&record, today()), Category::AssignedOther);
}

#[test]
fn unassigned_record_availability_depends_on_distance() {
    let far_assigned = TerritoryRecord::new("Assigned", "PA")
        .with_coordinates(north_of(origin(), 10.0).latitude, origin().longitude)
        .with_representative("X")
        .with_assigned_on(days_ago(10));
    let near_assigned = TerritoryRecord::new("Assigned", "PA")
        .with_coordinates(north_of(origin(), 5.0).latitude, origin().longitude)
        .with_representative("X")
        .with_assigned_on(days_ago(10));
    let candidate = TerritoryRecord::new("Record E", "PA")
        .with_coordinates(origin().latitude, origin().longitude);

    assert_eq!(category_for(&candidate, today()), Category::Available);

    let far = classify([far_assigned, candidate.clone()], today());
    let available = find_available(&far, 7.0);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].record.city, "Record E");

    let near = classify([near_assigned, candidate], today());
    assert!(find_available(&near, 7.0).is_empty());
}

#[test]
fn a_record_exactly_at_the_threshold_is_not_available() {
    let assigned_at = north_of(origin(), 7.0);
    let records = classify(
        [
            TerritoryRecord::new("Assigned", "PA")
                .with_coordinates(assigned_at.latitude, assigned_at.longitude)
                .with_representative("X"),
            TerritoryRecord::new("Candidate", "PA")
                .with_coordinates(origin().latitude, origin().longitude),
        ],
        today(),
    );
    let distance = haversine_miles(origin(), assigned_at);
    assert!((distance - 7.0).abs() < 1e-9);

    assert!(find_available(&records, distance).is_empty());
}

#[test]
fn classification_is_total_and_idempotent() {
    let records = vec![
        TerritoryRecord::new("A", "IA")
            .with_representative("X")
            .with_assigned_on(days_ago(5)),
        TerritoryRecord::new("B", "IA")
            .with_representative("X")
            .with_assigned_on(days_ago(240)),
        TerritoryRecord::new("C", "IA")
            .with_representative("Y")
            .with_assigned_on(days_ago(400)),
        TerritoryRecord::new("D", "IA").with_representative("Y"),
        TerritoryRecord::new("E", "IA"),
        TerritoryRecord::new("F", "IA").with_assigned_on(days_ago(30)),
    ];

    let first = classify(records.clone(), today());
    assert_eq!(first.len(), records.len());
    assert!(first
        .iter()
        .all(|entry| Category::ordered().contains(&entry.category)));

    let second = reclassify(first.clone(), today());
    assert_eq!(first, second);
}

#[test]
fn no_assigned_records_leave_every_located_candidate_available() {
    let records = classify(
        [
            TerritoryRecord::new("A", "IA").with_coordinates(41.0, -93.0),
            TerritoryRecord::new("B", "IA").with_coordinates(41.0001, -93.0),
            TerritoryRecord::new("C", "IA"),
        ],
        today(),
    );
    let available: Vec<&str> = find_available(&records, 7.0)
        .into_iter()
        .map(|entry| entry.record.city.as_str())
        .collect();
    assert_eq!(available, vec!["A", "B"]);
}

#[test]
fn summary_totals_add_up_and_missing_cells_read_zero() {
    let classified = classify(
        [
            TerritoryRecord::new("A", "IA")
                .with_representative("Jordan")
                .with_assigned_on(days_ago(5)),
            TerritoryRecord::new("B", "IA")
                .with_representative("Jordan")
                .with_assigned_on(days_ago(400)),
            TerritoryRecord::new("C", "IA").with_representative("Riley"),
            TerritoryRecord::new("D", "IA"),
        ],
        today(),
    );
    let summary = summarize(&classified);

    assert_eq!(summary.rows.len(), 2);
    for row in &summary.rows {
        assert_eq!(row.total, row.counts.total());
    }
    assert_eq!(summary.count("Jordan", Category::AssignedAging), 0);
    assert_eq!(summary.count("Riley", Category::AssignedOther), 1);
    assert_eq!(summary.totals.total, 3);
}

#[test]
fn empty_search_matches_the_same_as_no_search() {
    let classified: Vec<ClassifiedTerritory> = classify(
        [
            TerritoryRecord::new("Des Moines", "IA")
                .with_population(214_000)
                .with_representative("Jordan"),
            TerritoryRecord::new("Ames", "IA").with_population(66_000),
        ],
        today(),
    );

    let base = TerritoryQuery::for_regions(["IA"]);
    let mut blank = base.clone();
    blank.search = String::new();

    assert_eq!(blank.filter(&classified).len(), classified.len());
    assert_eq!(base.filter(&classified), blank.filter(&classified));
}
