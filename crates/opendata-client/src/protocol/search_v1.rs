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

//! Legacy `records/1.0/search` envelope.
//!
//! ```text
//! { "nhits": 140000, "records": [ { "recordid": "...", "fields": { "name": "Tokyo",
//!   "coordinates": [35.6895, 139.69171], "population": 8336599 } } ] }
//! ```

use serde_json::Value;

use super::{parse_envelope, record_list, CityRecord, ResponseFormat};
use crate::FetchError;

/// Parser for the v1 search envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchV1Format;

impl ResponseFormat for SearchV1Format {
    fn parse(&self, body: &[u8]) -> Result<Vec<CityRecord>, FetchError> {
        let envelope = parse_envelope(body)?;
        let records = record_list(&envelope, "records")?;

        Ok(records
            .iter()
            .map(|record| {
                // A record without a fields object still counts as a record; it
                // is skipped later for lacking coordinates.
                let fields = record.get("fields").unwrap_or(&Value::Null);
                CityRecord::from_fields(fields)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let body = br#"{
            "nhits": 2,
            "records": [
                {"recordid": "a", "fields": {"name": "Tokyo", "coordinates": [35.6895, 139.69171], "population": 8336599}},
                {"recordid": "b", "fields": {"name": "Lagos", "coordinates": [6.45407, 3.39467], "population": null}}
            ]
        }"#;

        let records = SearchV1Format.parse(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Tokyo");
        assert_eq!(records[0].population, Some(8_336_599.0));
        assert_eq!(records[1].name, "Lagos");
        assert_eq!(records[1].population, None);
    }

    #[test]
    fn test_missing_records_is_empty() {
        let records = SearchV1Format.parse(br#"{"nhits": 0}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_records_of_wrong_type() {
        let result = SearchV1Format.parse(br#"{"records": {"name": "Tokyo"}}"#);
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_record_without_fields() {
        let records = SearchV1Format.parse(br#"{"records": [{"recordid": "x"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].position().is_none());
    }
}
