use super::domain::{Category, ClassifiedTerritory, TerritoryRecord};
use chrono::NaiveDate;

/// Upper bound (inclusive) in days for a recent assignment.
pub const RECENT_WINDOW_DAYS: i64 = 210;
/// Upper bound (inclusive) in days for an aging assignment.
pub const AGING_WINDOW_DAYS: i64 = 270;

/// Derives the category of a single record as of `today`.
///
/// Assignments dated in the future produce a negative age and count as recent.
pub fn category_for(record: &TerritoryRecord, today: NaiveDate) -> Category {
    match record.assigned_on {
        Some(assigned_on) => {
            let age = (today - assigned_on).num_days();
            if age <= RECENT_WINDOW_DAYS {
                Category::AssignedRecent
            } else if age <= AGING_WINDOW_DAYS {
                Category::AssignedAging
            } else if record.deal_count == 0 {
                Category::AssignedStaleNoDeals
            } else {
                Category::AssignedOther
            }
        }
        None if record.representative.is_some() => Category::AssignedOther,
        None => Category::Available,
    }
}

pub fn classify<I>(records: I, today: NaiveDate) -> Vec<ClassifiedTerritory>
where
    I: IntoIterator<Item = TerritoryRecord>,
{
    records
        .into_iter()
        .map(|record| {
            let category = category_for(&record, today);
            ClassifiedTerritory { record, category }
        })
        .collect()
}

/// Recomputes categories for an already classified set.
pub fn reclassify(
    classified: Vec<ClassifiedTerritory>,
    today: NaiveDate,
) -> Vec<ClassifiedTerritory> {
    classify(classified.into_iter().map(|entry| entry.record), today)
}
