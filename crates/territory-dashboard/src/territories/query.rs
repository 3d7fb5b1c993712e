use super::domain::{Category, ClassifiedTerritory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_MIN_POPULATION: u64 = 10_000;

/// A clicked summary cell: one representative and one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub representative: String,
    pub category: Category,
}

impl Selection {
    pub fn new(representative: impl Into<String>, category: Category) -> Self {
        Self {
            representative: representative.into(),
            category,
        }
    }
}

/// Clicking the active cell clears the selection; any other cell replaces it.
pub fn next_selection(current: Option<&Selection>, clicked: Selection) -> Option<Selection> {
    match current {
        Some(active) if *active == clicked => None,
        _ => Some(clicked),
    }
}

/// Conjunctive filter over classified territories.
///
/// Absent population passes only a zero floor. An empty region set matches
/// nothing; callers decide whether that is worth a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryQuery {
    #[serde(default)]
    pub regions: BTreeSet<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub representative: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_min_population")]
    pub min_population: u64,
}

fn default_min_population() -> u64 {
    DEFAULT_MIN_POPULATION
}

impl Default for TerritoryQuery {
    fn default() -> Self {
        Self {
            regions: BTreeSet::new(),
            search: String::new(),
            representative: None,
            category: None,
            min_population: DEFAULT_MIN_POPULATION,
        }
    }
}

impl TerritoryQuery {
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

    pub fn with_selection(mut self, selection: Option<&Selection>) -> Self {
        self.representative = selection.map(|active| active.representative.clone());
        self.category = selection.map(|active| active.category);
        self
    }

    pub fn matches(&self, entry: &ClassifiedTerritory) -> bool {
        self.in_region(entry)
            && self.meets_population(entry)
            && self.matches_search(entry)
            && self.matches_representative(entry)
            && self.category.map_or(true, |category| entry.category == category)
    }

    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a ClassifiedTerritory>
    where
        I: IntoIterator<Item = &'a ClassifiedTerritory>,
    {
        records
            .into_iter()
            .filter(|entry| self.matches(entry))
            .collect()
    }

    fn in_region(&self, entry: &ClassifiedTerritory) -> bool {
        self.regions.contains(&entry.record.state)
    }

    fn meets_population(&self, entry: &ClassifiedTerritory) -> bool {
        match entry.record.population {
            Some(population) => population >= self.min_population,
            None => self.min_population == 0,
        }
    }

    fn matches_search(&self, entry: &ClassifiedTerritory) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(&entry.record.city)
            || contains(&entry.record.state)
            || entry.representative().is_some_and(contains)
    }

    fn matches_representative(&self, entry: &ClassifiedTerritory) -> bool {
        match &self.representative {
            Some(wanted) => entry.representative() == Some(wanted.as_str()),
            None => true,
        }
    }
}
