use super::super::domain::{Coordinates, TerritoryRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Parses a territory list. Cell-level problems become absent values; only
/// framing errors and missing required columns fail the load.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<TerritoryRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .deserialize::<TerritoryRow>()
        .map(|row| row.map(TerritoryRow::into_record))
        .collect()
}

#[derive(Debug, Deserialize)]
struct TerritoryRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Latitude", deserialize_with = "empty_string_as_none")]
    latitude: Option<String>,
    #[serde(rename = "Longitude", deserialize_with = "empty_string_as_none")]
    longitude: Option<String>,
    #[serde(
        rename = "Population",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    population: Option<String>,
    #[serde(
        rename = "Rep Assigned",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    representative: Option<String>,
    #[serde(
        rename = "Date Assigned to Rep",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    assigned_on: Option<String>,
    #[serde(
        rename = "Sale Entry Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    sale_entry_on: Option<String>,
    #[serde(rename = "Deals", default, deserialize_with = "empty_string_as_none")]
    deals: Option<String>,
}

impl TerritoryRow {
    fn into_record(self) -> TerritoryRecord {
        let coordinates = match (
            self.latitude.as_deref().and_then(parse_latitude),
            self.longitude.as_deref().and_then(parse_longitude),
        ) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };

        TerritoryRecord {
            city: self.city,
            state: self.state,
            coordinates,
            population: self.population.as_deref().and_then(parse_count),
            assigned_on: self.assigned_on.as_deref().and_then(parse_date),
            representative: self.representative,
            deal_count: self
                .deals
                .as_deref()
                .and_then(parse_count)
                .and_then(|deals| u32::try_from(deals).ok())
                .unwrap_or(0),
            sale_entry_on: self.sale_entry_on.as_deref().and_then(parse_date),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !is_missing_marker(value)))
}

fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_latitude(value: &str) -> Option<f64> {
    parse_number(value).filter(|lat| (-90.0..=90.0).contains(lat))
}

fn parse_longitude(value: &str) -> Option<f64> {
    parse_number(value).filter(|lon| (-180.0..=180.0).contains(lon))
}

/// Non-negative whole numbers; spreadsheet floats such as `3.0` are accepted.
fn parse_count(value: &str) -> Option<u64> {
    let number = parse_number(value)?;
    if number < 0.0 || number.fract() != 0.0 || number > u64::MAX as f64 {
        return None;
    }
    Some(number as u64)
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}

#[cfg(test)]
pub(crate) fn parse_count_for_tests(value: &str) -> Option<u64> {
    parse_count(value)
}
