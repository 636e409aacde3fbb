// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response layer for the Opendatasoft records API.
//!
//! This module provides a trait-based abstraction over the two response
//! envelopes the public portal serves: the legacy `records/1.0/search`
//! endpoint and the `explore/v2.1` catalog endpoint. Both are normalised into
//! the same [`CityRecord`] layout so downstream code never cares which one
//! produced the data.

mod explore_v2;
mod search_v1;

pub use explore_v2::ExploreV2Format;
pub use search_v1::SearchV1Format;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FetchError;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees (-180 to 180).
    pub lon: f64,
    /// Latitude in degrees (-90 to 90).
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range values.
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        valid.then_some(Self { lon, lat })
    }
}

/// One city as delivered by the API, before any validation.
///
/// `coordinates` keeps the dataset's raw pair. The portal serves
/// `geo_point_2d` fields as `[lat, lon]`, so index 1 is the longitude and
/// index 0 the latitude.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityRecord {
    /// City name (empty when the API omits it).
    pub name: String,
    /// Raw coordinate pair, `None` when absent or not an array of numbers.
    pub coordinates: Option<Vec<f64>>,
    /// Population, `None` when absent, null or not a number.
    pub population: Option<f64>,
}

impl CityRecord {
    /// Create a record from already-typed values.
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: Option<Vec<f64>>, population: Option<f64>) -> Self {
        Self {
            name: name.into(),
            coordinates,
            population,
        }
    }

    /// Build a record from the loosely-typed `fields` object of a response.
    ///
    /// Never fails: missing or mistyped members simply become `None` and are
    /// judged later by [`CityRecord::position`].
    pub(crate) fn from_fields(fields: &Value) -> Self {
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let coordinates = fields
            .get("coordinates")
            .and_then(Value::as_array)
            .and_then(|values| values.iter().map(Value::as_f64).collect::<Option<Vec<_>>>());

        let population = fields.get("population").and_then(Value::as_f64);

        Self {
            name,
            coordinates,
            population,
        }
    }

    /// Geographic position of this city, if the coordinates are usable.
    ///
    /// Reads `coordinates[1]` as longitude and `coordinates[0]` as latitude.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        match self.coordinates.as_deref() {
            Some([lat, lon, ..]) => GeoPoint::new(*lon, *lat),
            _ => None,
        }
    }

    /// Population with absent values treated as zero.
    #[must_use]
    pub fn population_or_zero(&self) -> f64 {
        self.population.unwrap_or(0.0)
    }

    /// Name suitable for log output.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

/// Which response envelope an endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// `/api/records/1.0/search/` with a `records[].fields` envelope.
    #[default]
    V1,
    /// `/api/explore/v2.1/catalog/datasets/<id>/records` with a flat `results[]` envelope.
    V2,
}

impl ApiVersion {
    /// Parse a response body with the matching format.
    pub fn parse(self, body: &[u8]) -> Result<Vec<CityRecord>, FetchError> {
        match self {
            Self::V1 => SearchV1Format.parse(body),
            Self::V2 => ExploreV2Format.parse(body),
        }
    }
}

/// Trait for response formats.
///
/// Implement this trait to support another envelope shape.
pub trait ResponseFormat {
    /// Parse a response body into raw city records.
    ///
    /// Returns `Ok(records)` when the body has the expected shape (an absent
    /// record list yields an empty vector), or `Err(FetchError::Parse)` when the
    /// body is not JSON or the envelope is of the wrong type.
    fn parse(&self, body: &[u8]) -> Result<Vec<CityRecord>, FetchError>;
}

/// Decode a body into a JSON object, the common first step of every format.
fn parse_envelope(body: &[u8]) -> Result<serde_json::Map<String, Value>, FetchError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FetchError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(FetchError::Parse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pull the named array out of an envelope.
///
/// An absent or null member is "no data"; any other non-array type is a shape error.
fn record_list<'a>(
    envelope: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a [Value], FetchError> {
    match envelope.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(FetchError::Parse(format!(
            "expected '{key}' to be an array, got {}",
            json_kind(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_reads_index_one_as_longitude() {
        let record = CityRecord::new("Paris", Some(vec![48.85, 2.35]), Some(2_148_000.0));
        let position = record.position().unwrap();
        assert!((position.lon - 2.35).abs() < f64::EPSILON);
        assert!((position.lat - 48.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_position_rejects_short_pair() {
        let record = CityRecord::new("Paris", Some(vec![48.85]), Some(2_148_000.0));
        assert!(record.position().is_none());
    }

    #[test]
    fn test_position_rejects_out_of_range_latitude() {
        let record = CityRecord::new("Nowhere", Some(vec![123.0, 10.0]), None);
        assert!(record.position().is_none());
    }

    #[test]
    fn test_position_uses_first_two_values() {
        let record = CityRecord::new("Extra", Some(vec![10.0, 20.0, 30.0]), None);
        assert_eq!(record.position(), GeoPoint::new(20.0, 10.0));
    }

    #[test]
    fn test_from_fields_tolerates_missing_members() {
        let record = CityRecord::from_fields(&json!({ "coordinates": [1.0, 2.0] }));
        assert_eq!(record.name, "");
        assert_eq!(record.display_name(), "<unnamed>");
        assert_eq!(record.population, None);
        assert!((record.population_or_zero()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_fields_non_numeric_coordinates() {
        let record = CityRecord::from_fields(&json!({
            "name": "Broken",
            "coordinates": ["48.85", 2.35],
            "population": null
        }));
        assert_eq!(record.coordinates, None);
        assert!(record.position().is_none());
    }

    #[test]
    fn test_envelope_must_be_object() {
        let result = parse_envelope(b"[1, 2, 3]");
        assert!(matches!(result, Err(FetchError::Parse(msg)) if msg.contains("an array")));
    }

    #[test]
    fn test_envelope_invalid_json() {
        assert!(matches!(parse_envelope(b"<html>"), Err(FetchError::Parse(_))));
    }
}
