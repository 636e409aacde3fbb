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

//! Client library for fetching city records from the Opendatasoft portal.
//!
//! The library is split into small layers that can be used on their own:
//!
//! - **Protocol layer**: parses the v1 search and v2.1 explore response
//!   envelopes into a common [`CityRecord`] type
//! - **Batch layer**: per-record coordinate validation with partial success
//! - **HTTP layer**: query construction and a single async GET
//!
//! # Quick Start
//!
//! ```no_run
//! use opendata_client::{CityClient, DatasetQuery};
//!
//! # async fn example() -> Result<(), opendata_client::FetchError> {
//! let client = CityClient::new(DatasetQuery::default(), None)?;
//! let batch = client.fetch_cities().await?;
//! for city in &batch.records {
//!     println!("{}: {:?}", city.name, city.position());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Parsing Without the Network
//!
//! ```
//! use opendata_client::protocol::ApiVersion;
//!
//! let body = br#"{"records": [{"fields": {"name": "Paris", "coordinates": [48.85, 2.35]}}]}"#;
//! let records = ApiVersion::V1.parse(body).unwrap();
//! assert_eq!(records[0].position().unwrap().lon, 2.35);
//! ```

pub mod batch;
pub mod error;
pub mod http;
pub mod protocol;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use batch::CityBatch;
pub use error::{FetchError, RecordSkipped};
pub use http::{CityClient, DatasetQuery};
pub use protocol::{ApiVersion, CityRecord, GeoPoint, ResponseFormat};
