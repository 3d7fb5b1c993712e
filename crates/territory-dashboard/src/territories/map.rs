use super::domain::{Category, ClassifiedTerritory, Coordinates};
use serde::{Deserialize, Serialize};

/// Per-category marker toggles; everything is visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryVisibility {
    pub assigned_recent: bool,
    pub assigned_aging: bool,
    pub assigned_stale_no_deals: bool,
    pub assigned_other: bool,
    pub available: bool,
}

impl Default for CategoryVisibility {
    fn default() -> Self {
        Self {
            assigned_recent: true,
            assigned_aging: true,
            assigned_stale_no_deals: true,
            assigned_other: true,
            available: true,
        }
    }
}

impl CategoryVisibility {
    pub fn is_visible(&self, category: Category) -> bool {
        match category {
            Category::AssignedRecent => self.assigned_recent,
            Category::AssignedAging => self.assigned_aging,
            Category::AssignedStaleNoDeals => self.assigned_stale_no_deals,
            Category::AssignedOther => self.assigned_other,
            Category::Available => self.available,
        }
    }

    pub fn hide(&mut self, category: Category) {
        let flag = match category {
            Category::AssignedRecent => &mut self.assigned_recent,
            Category::AssignedAging => &mut self.assigned_aging,
            Category::AssignedStaleNoDeals => &mut self.assigned_stale_no_deals,
            Category::AssignedOther => &mut self.assigned_other,
            Category::Available => &mut self.available,
        };
        *flag = false;
    }
}

/// Distinguishes ordinary territory pins from proximity-qualified open cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Territory,
    AvailableCity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: Coordinates,
    pub label: String,
    pub category: Category,
    pub color: &'static str,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinates>,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    pub fn available_city_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|marker| marker.kind == MarkerKind::AvailableCity)
            .count()
    }
}

/// One marker per located filtered territory whose category is visible.
///
/// Unassigned territories that also appear in `available` are drawn as
/// [`MarkerKind::AvailableCity`]; the rest keep the plain territory label.
/// Entries of `available` missing from `filtered` are appended as open cities.
pub fn build_map<'a>(
    filtered: &[&'a ClassifiedTerritory],
    available: &[&'a ClassifiedTerritory],
    visibility: &CategoryVisibility,
) -> MapView {
    let center = mean_position(filtered.iter().filter_map(|entry| entry.coordinates()));

    let territory_markers = filtered
        .iter()
        .filter(|entry| visibility.is_visible(entry.category))
        .filter_map(|entry| {
            let kind = if entry.category == Category::Available && holds(available, entry) {
                MarkerKind::AvailableCity
            } else {
                MarkerKind::Territory
            };
            marker(entry, kind)
        });

    let extra_available = available
        .iter()
        .filter(|_| visibility.available)
        .filter(|entry| !holds(filtered, entry))
        .filter_map(|entry| marker(entry, MarkerKind::AvailableCity));

    MapView {
        center,
        markers: territory_markers.chain(extra_available).collect(),
    }
}

fn holds(set: &[&ClassifiedTerritory], entry: &ClassifiedTerritory) -> bool {
    set.iter().any(|member| std::ptr::eq(*member, entry))
}

fn marker(entry: &ClassifiedTerritory, kind: MarkerKind) -> Option<MapMarker> {
    let position = entry.coordinates()?;
    let (label, category) = match kind {
        MarkerKind::Territory => (territory_label(entry), entry.category),
        MarkerKind::AvailableCity => (available_label(entry), Category::Available),
    };
    Some(MapMarker {
        position,
        label,
        category,
        color: category.color(),
        kind,
    })
}

fn mean_position<I>(points: I) -> Option<Coordinates>
where
    I: Iterator<Item = Coordinates>,
{
    let (count, latitude, longitude) = points.fold((0usize, 0.0, 0.0), |(n, lat, lon), point| {
        (n + 1, lat + point.latitude, lon + point.longitude)
    });
    (count > 0).then(|| Coordinates::new(latitude / count as f64, longitude / count as f64))
}

fn population_label(entry: &ClassifiedTerritory) -> String {
    entry
        .record
        .population
        .map(|population| population.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn territory_label(entry: &ClassifiedTerritory) -> String {
    format!(
        "{}, {} | population {} | rep {} | {}",
        entry.record.city,
        entry.record.state,
        population_label(entry),
        entry.representative().unwrap_or("Unassigned"),
        entry.category.label()
    )
}

fn available_label(entry: &ClassifiedTerritory) -> String {
    format!(
        "Available city: {}, {} | population {}",
        entry.record.city,
        entry.record.state,
        population_label(entry)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::territories::domain::TerritoryRecord;

    fn entry(
        city: &str,
        category: Category,
        coordinates: Option<(f64, f64)>,
    ) -> ClassifiedTerritory {
        let mut record = TerritoryRecord::new(city, "IA");
        record.coordinates = coordinates.map(|(lat, lon)| Coordinates::new(lat, lon));
        if category != Category::Available {
            record.representative = Some("Jordan".to_string());
        }
        ClassifiedTerritory { record, category }
    }

    #[test]
    fn unassigned_territories_near_assigned_ones_are_still_drawn() {
        let assigned = entry("Des Moines", Category::AssignedRecent, Some((41.5868, -93.6250)));
        let near = entry("West Des Moines", Category::Available, Some((41.5772, -93.7113)));
        let far = entry("Sioux City", Category::Available, Some((42.4963, -96.4049)));

        let filtered = vec![&assigned, &near, &far];
        let available = vec![&far];
        let view = build_map(&filtered, &available, &CategoryVisibility::default());

        assert_eq!(view.markers.len(), 3);
        assert!(view.markers[0].label.starts_with("Des Moines, IA"));
        assert_eq!(view.markers[0].kind, MarkerKind::Territory);

        assert!(view.markers[1].label.starts_with("West Des Moines, IA"));
        assert!(view.markers[1].label.contains("rep Unassigned"));
        assert_eq!(view.markers[1].kind, MarkerKind::Territory);
        assert_eq!(view.markers[1].color, "purple");

        assert!(view.markers[2].label.starts_with("Available city: Sioux City"));
        assert_eq!(view.markers[2].kind, MarkerKind::AvailableCity);
        assert_eq!(view.available_city_count(), 1);
    }

    #[test]
    fn available_entries_outside_the_filtered_set_are_appended() {
        let assigned = entry("Des Moines", Category::AssignedRecent, Some((41.6, -93.6)));
        let far = entry("Sioux City", Category::Available, Some((42.5, -96.4)));

        let view = build_map(&[&assigned], &[&far], &CategoryVisibility::default());
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[1].kind, MarkerKind::AvailableCity);
    }

    #[test]
    fn hidden_categories_and_unlocated_records_are_skipped() {
        let recent = entry("Des Moines", Category::AssignedRecent, Some((41.6, -93.6)));
        let aging = entry("Ames", Category::AssignedAging, Some((42.0, -93.6)));
        let ghost = entry("Ghost", Category::AssignedOther, None);
        let far = entry("Sioux City", Category::Available, Some((42.5, -96.4)));

        let mut visibility = CategoryVisibility::default();
        visibility.hide(Category::AssignedAging);
        visibility.hide(Category::Available);

        let view = build_map(&[&recent, &aging, &ghost], &[&far], &visibility);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].category, Category::AssignedRecent);
        assert_eq!(view.markers[0].color, "blue");
    }

    #[test]
    fn center_is_mean_of_located_filtered_records() {
        let a = entry("A", Category::AssignedRecent, Some((40.0, -90.0)));
        let b = entry("B", Category::AssignedRecent, Some((42.0, -94.0)));
        let c = entry("C", Category::AssignedRecent, None);
        let view = build_map(&[&a, &b, &c], &[], &CategoryVisibility::default());
        assert_eq!(view.center, Some(Coordinates::new(41.0, -92.0)));

        let empty = build_map(&[], &[], &CategoryVisibility::default());
        assert!(empty.center.is_none());
        assert!(empty.markers.is_empty());
    }
}
