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

//! Explore API v2.1 envelope.
//!
//! ```text
//! { "total_count": 140000, "results": [ { "name": "Tokyo",
//!   "coordinates": { "lon": 139.69171, "lat": 35.6895 }, "population": 8336599 } ] }
//! ```

use serde_json::Value;

use super::{parse_envelope, record_list, CityRecord, ResponseFormat};
use crate::FetchError;

/// Parser for the v2.1 explore envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExploreV2Format;

impl ResponseFormat for ExploreV2Format {
    fn parse(&self, body: &[u8]) -> Result<Vec<CityRecord>, FetchError> {
        let envelope = parse_envelope(body)?;
        let results = record_list(&envelope, "results")?;

        Ok(results.iter().map(normalise).collect())
    }
}

/// Rewrite a v2 result into the v1 field layout.
///
/// v2 serves geo points as `{lon, lat}` objects; v1 as `[lat, lon]` arrays.
fn normalise(result: &Value) -> CityRecord {
    let mut record = CityRecord::from_fields(result);

    if let Some(point) = result.get("coordinates").and_then(Value::as_object) {
        let lat = point.get("lat").and_then(Value::as_f64);
        let lon = point.get("lon").and_then(Value::as_f64);
        record.coordinates = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(vec![lat, lon]),
            _ => None,
        };
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(name: &str, lon: f64, lat: f64, population: u64) -> Value {
        json!({ "name": name, "coordinates": { "lon": lon, "lat": lat }, "population": population })
    }

    #[test]
    fn test_parse_results() {
        let body = json!({
            "total_count": 2,
            "results": [result("Paris", 2.3488, 48.85341, 2_138_551), result("Berlin", 13.41053, 52.52437, 3_426_354)]
        })
        .to_string();

        let records = ExploreV2Format.parse(body.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let paris = records[0].position().unwrap();
        assert!((paris.lon - 2.3488).abs() < 1e-9);
        assert!((paris.lat - 48.85341).abs() < 1e-9);
        assert_eq!(records[1].name, "Berlin");
    }

    #[test]
    fn test_incomplete_point_is_unusable() {
        let body = br#"{"results": [{"name": "Half", "coordinates": {"lon": 2.0}}]}"#;
        let records = ExploreV2Format.parse(body).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].position().is_none());
    }

    #[test]
    fn test_missing_results_is_empty() {
        assert!(ExploreV2Format.parse(br#"{"total_count": 0}"#).unwrap().is_empty());
    }
}
