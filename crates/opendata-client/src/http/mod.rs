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

//! HTTP layer: query construction and the single-request fetch.

use std::time::Duration;

use log::{debug, info};
use reqwest::Url;

use crate::batch::CityBatch;
use crate::error::FetchError;
use crate::protocol::ApiVersion;

/// Public Opendatasoft portal.
pub const DEFAULT_BASE_URL: &str = "https://public.opendatasoft.com";
/// GeoNames cities with a population above 1000.
pub const DEFAULT_DATASET: &str = "geonames-all-cities-with-a-population-1000";
/// Rows requested per fetch.
pub const DEFAULT_ROWS: u32 = 50;
/// Sort field; the v1 API sorts descending by default.
pub const DEFAULT_SORT: &str = "population";

/// The explore API refuses limits above this.
const EXPLORE_MAX_LIMIT: u32 = 100;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The fixed request a client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetQuery {
    /// Portal base URL, without the `/api` path.
    pub base_url: String,
    /// Which endpoint family to call.
    pub api: ApiVersion,
    /// Dataset identifier.
    pub dataset: String,
    /// Number of rows to request.
    pub rows: u32,
    /// Field to sort by.
    pub sort: String,
}

impl Default for DatasetQuery {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api: ApiVersion::default(),
            dataset: DEFAULT_DATASET.to_string(),
            rows: DEFAULT_ROWS,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl DatasetQuery {
    /// Build the request URL.
    ///
    /// The dataset id is always a single path segment or query value, so
    /// `/` and `?` inside it are escaped rather than interpreted.
    pub fn url(&self) -> Result<Url, FetchError> {
        let base = self.base_url.trim_end_matches('/');
        let mut url =
            Url::parse(base).map_err(|e| FetchError::InvalidEndpoint(format!("{base}: {e}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::InvalidEndpoint(format!("{base}: cannot be a base URL"))
            })?;
            segments.pop_if_empty();
            match self.api {
                ApiVersion::V1 => {
                    segments.extend(["api", "records", "1.0", "search", ""]);
                }
                ApiVersion::V2 => {
                    segments
                        .extend(["api", "explore", "v2.1", "catalog", "datasets"])
                        .push(&self.dataset)
                        .push("records");
                }
            }
        }

        match self.api {
            ApiVersion::V1 => {
                url.query_pairs_mut()
                    .append_pair("dataset", &self.dataset)
                    .append_pair("rows", &self.rows.to_string())
                    .append_pair("sort", &self.sort);
            }
            ApiVersion::V2 => {
                url.query_pairs_mut()
                    .append_pair("limit", &self.rows.min(EXPLORE_MAX_LIMIT).to_string())
                    .append_pair("order_by", &format!("{} desc", self.sort));
            }
        }

        Ok(url)
    }
}

/// Client for the city records endpoint.
///
/// Holds no state between calls other than the connection pool.
#[derive(Debug, Clone)]
pub struct CityClient {
    http: reqwest::Client,
    query: DatasetQuery,
}

impl CityClient {
    /// Create a client with an optional whole-request timeout.
    pub fn new(query: DatasetQuery, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_http_client(query, builder.build()?))
    }

    /// Create a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_http_client(query: DatasetQuery, http: reqwest::Client) -> Self {
        Self { http, query }
    }

    /// The query this client issues.
    #[must_use]
    pub fn query(&self) -> &DatasetQuery {
        &self.query
    }

    /// Issue the request and validate the result.
    pub async fn fetch_cities(&self) -> Result<CityBatch, FetchError> {
        let url = self.query.url()?;
        info!("Fetching cities from {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("API response: {} bytes", body.len());

        let raw = self.query.api.parse(&body)?;
        CityBatch::from_raw(raw)
    }
}
