use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status bucket derived for every territory on each classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AssignedRecent,
    AssignedAging,
    AssignedStaleNoDeals,
    AssignedOther,
    Available,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::AssignedRecent,
            Self::AssignedAging,
            Self::AssignedStaleNoDeals,
            Self::AssignedOther,
            Self::Available,
        ]
    }

    /// Categories that can be attributed to a representative.
    pub const fn assigned() -> [Self; 4] {
        [
            Self::AssignedRecent,
            Self::AssignedAging,
            Self::AssignedStaleNoDeals,
            Self::AssignedOther,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AssignedRecent => "Assigned within 7 months",
            Self::AssignedAging => "Assigned 7-9 months ago",
            Self::AssignedStaleNoDeals => "Assigned 9+ months ago, 0 deals",
            Self::AssignedOther => "Assigned Other",
            Self::Available => "Available",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AssignedRecent => "assigned_recent",
            Self::AssignedAging => "assigned_aging",
            Self::AssignedStaleNoDeals => "assigned_stale_no_deals",
            Self::AssignedOther => "assigned_other",
            Self::Available => "available",
        }
    }

    /// Marker colour used by the map front end.
    pub const fn color(self) -> &'static str {
        match self {
            Self::AssignedRecent => "blue",
            Self::AssignedAging => "orange",
            Self::AssignedStaleNoDeals => "red",
            Self::AssignedOther => "black",
            Self::Available => "purple",
        }
    }

    /// Accepts the snake_case key, the marker colour, or the human label.
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ordered().into_iter().find(|category| {
            category.key().eq_ignore_ascii_case(needle)
                || category.color().eq_ignore_ascii_case(needle)
                || category.label().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decimal-degree position of a territory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One row of the territory list, normalized at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerritoryRecord {
    pub city: String,
    pub state: String,
    pub coordinates: Option<Coordinates>,
    pub population: Option<u64>,
    pub assigned_on: Option<NaiveDate>,
    pub representative: Option<String>,
    pub deal_count: u32,
    pub sale_entry_on: Option<NaiveDate>,
}

impl TerritoryRecord {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            coordinates: None,
            population: None,
            assigned_on: None,
            representative: None,
            deal_count: 0,
            sale_entry_on: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_representative(mut self, representative: impl Into<String>) -> Self {
        self.representative = Some(representative.into());
        self
    }

    pub fn with_assigned_on(mut self, assigned_on: NaiveDate) -> Self {
        self.assigned_on = Some(assigned_on);
        self
    }

    pub fn with_deal_count(mut self, deal_count: u32) -> Self {
        self.deal_count = deal_count;
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.representative.is_some()
    }
}

/// A territory paired with the category computed for a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedTerritory {
    #[serde(flatten)]
    pub record: TerritoryRecord,
    pub category: Category,
}

impl ClassifiedTerritory {
    pub fn representative(&self) -> Option<&str> {
        self.record.representative.as_deref()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.record.coordinates
    }
}
