use super::domain::{ClassifiedTerritory, Coordinates};

/// Mean earth radius used by the dashboard, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;
pub const DEFAULT_THRESHOLD_MILES: f64 = 7.0;

/// Great-circle distance in miles between two points (haversine).
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Lookup over the assigned territories used to reject unassigned candidates.
///
/// Implementations must agree with [`LinearScan`]: a point is "within" when
/// some assigned point lies at a haversine distance `<= threshold_miles`.
pub trait ProximityIndex {
    fn any_within(&self, point: Coordinates, threshold_miles: f64) -> bool;
}

/// Brute-force index: every query walks all assigned points.
///
/// Cost is O(assigned) per query, O(assigned x unassigned) per pass. That is
/// fine for a few thousand territories; larger lists need a grid or k-d tree
/// implementing [`ProximityIndex`].
#[derive(Debug, Default, Clone)]
pub struct LinearScan {
    points: Vec<Coordinates>,
}

impl LinearScan {
    pub fn new(points: Vec<Coordinates>) -> Self {
        Self { points }
    }

    /// Builds the index from the located, assigned subset of `records`.
    pub fn from_assigned<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedTerritory>,
    {
        let points = records
            .into_iter()
            .filter(|entry| entry.record.is_assigned())
            .filter_map(ClassifiedTerritory::coordinates)
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ProximityIndex for LinearScan {
    fn any_within(&self, point: Coordinates, threshold_miles: f64) -> bool {
        self.points
            .iter()
            .any(|assigned| haversine_miles(point, *assigned) <= threshold_miles)
    }
}

/// Unassigned, located territories farther than `threshold_miles` from every
/// assigned, located territory.
pub fn find_available<'a>(
    records: &'a [ClassifiedTerritory],
    threshold_miles: f64,
) -> Vec<&'a ClassifiedTerritory> {
    let index = LinearScan::from_assigned(records);
    find_available_with(&index, records, threshold_miles)
}

/// Same as [`find_available`] with a caller-supplied index over the assigned set.
pub fn find_available_with<'a, P, I>(
    index: &P,
    candidates: I,
    threshold_miles: f64,
) -> Vec<&'a ClassifiedTerritory>
where
    P: ProximityIndex + ?Sized,
    I: IntoIterator<Item = &'a ClassifiedTerritory>,
{
    candidates
        .into_iter()
        .filter(|entry| !entry.record.is_assigned())
        .filter(|entry| match entry.coordinates() {
            Some(point) => !index.any_within(point, threshold_miles),
            None => false,
        })
        .collect()
}
