use super::domain::{Category, ClassifiedTerritory};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub recent: usize,
    pub aging: usize,
    pub stale_no_deals: usize,
    pub other: usize,
}

impl CategoryCounts {
    fn record(&mut self, category: Category) {
        match category {
            Category::AssignedRecent => self.recent += 1,
            Category::AssignedAging => self.aging += 1,
            Category::AssignedStaleNoDeals => self.stale_no_deals += 1,
            Category::AssignedOther => self.other += 1,
            Category::Available => {}
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::AssignedRecent => self.recent,
            Category::AssignedAging => self.aging,
            Category::AssignedStaleNoDeals => self.stale_no_deals,
            Category::AssignedOther => self.other,
            Category::Available => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.recent + self.aging + self.stale_no_deals + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepresentativeRow {
    pub representative: String,
    #[serde(flatten)]
    pub counts: CategoryCounts,
    pub total: usize,
}

/// Column sums across every representative row. Kept apart from the rows so no
/// representative name can collide with it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    #[serde(flatten)]
    pub counts: CategoryCounts,
    pub total: usize,
}

/// Representative x category cross-tab, rows sorted by representative.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RepresentativeSummary {
    pub rows: Vec<RepresentativeRow>,
    pub totals: SummaryTotals,
}

impl RepresentativeSummary {
    pub fn row(&self, representative: &str) -> Option<&RepresentativeRow> {
        self.rows
            .iter()
            .find(|row| row.representative == representative)
    }

    /// Cell lookup used by the selection toggle; unknown representatives read 0.
    pub fn count(&self, representative: &str, category: Category) -> usize {
        self.row(representative)
            .map(|row| row.counts.get(category))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn summarize<'a, I>(records: I) -> RepresentativeSummary
where
    I: IntoIterator<Item = &'a ClassifiedTerritory>,
{
    let mut grouped: BTreeMap<&'a str, CategoryCounts> = BTreeMap::new();
    for entry in records {
        let Some(representative) = entry.representative() else {
            continue;
        };
        grouped
            .entry(representative)
            .or_default()
            .record(entry.category);
    }

    let mut totals = CategoryCounts::default();
    let rows: Vec<RepresentativeRow> = grouped
        .into_iter()
        .map(|(representative, counts)| {
            totals.recent += counts.recent;
            totals.aging += counts.aging;
            totals.stale_no_deals += counts.stale_no_deals;
            totals.other += counts.other;
            RepresentativeRow {
                representative: representative.to_string(),
                counts,
                total: counts.total(),
            }
        })
        .collect();

    RepresentativeSummary {
        rows,
        totals: SummaryTotals {
            counts: totals,
            total: totals.total(),
        },
    }
}
