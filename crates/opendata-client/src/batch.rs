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

//! Validated result of one fetch.

use chrono::{DateTime, Utc};
use log::warn;

use crate::error::{FetchError, RecordSkipped};
use crate::protocol::CityRecord;

/// Records that survived validation, in response order.
#[derive(Debug, Clone)]
pub struct CityBatch {
    /// Records with usable coordinates.
    pub records: Vec<CityRecord>,
    /// Records dropped for bad coordinates.
    pub skipped: Vec<RecordSkipped>,
    /// When the response was received.
    pub fetched_at: DateTime<Utc>,
}

impl CityBatch {
    /// Validate raw records.
    ///
    /// Partial success is normal: bad records are logged and dropped. A batch
    /// with nothing usable left is [`FetchError::EmptyResult`].
    pub fn from_raw(raw: Vec<CityRecord>) -> Result<Self, FetchError> {
        if raw.is_empty() {
            return Err(FetchError::EmptyResult);
        }

        let mut records = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();

        for (index, record) in raw.into_iter().enumerate() {
            if record.position().is_some() {
                records.push(record);
            } else {
                let skip = RecordSkipped {
                    name: record.name,
                    index,
                };
                warn!("Skipping record: {}", skip);
                skipped.push(skip);
            }
        }

        if records.is_empty() {
            return Err(FetchError::EmptyResult);
        }

        Ok(Self {
            records,
            skipped,
            fetched_at: Utc::now(),
        })
    }

    /// Number of usable records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the batch holds no usable records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_batch_keeps_order() {
        let raw = vec![
            CityRecord::new("Tokyo", Some(vec![35.6895, 139.69171]), Some(8_336_599.0)),
            CityRecord::new("Paris", Some(vec![48.85]), Some(2_148_000.0)),
            CityRecord::new("Tokyo", Some(vec![35.6895, 139.69171]), Some(8_336_599.0)),
            CityRecord::new("Lima", None, None),
        ];

        let batch = CityBatch::from_raw(raw).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].name, "Tokyo");
        assert_eq!(batch.records[1].name, "Tokyo");
        assert_eq!(
            batch.skipped,
            vec![
                RecordSkipped { name: "Paris".to_string(), index: 1 },
                RecordSkipped { name: "Lima".to_string(), index: 3 },
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(CityBatch::from_raw(Vec::new()), Err(FetchError::EmptyResult)));
    }

    #[test]
    fn test_all_records_skipped() {
        let raw = vec![CityRecord::new("Paris", Some(vec![48.85]), None)];
        let err = CityBatch::from_raw(raw).unwrap_err();
        assert!(err.is_soft());
    }
}
