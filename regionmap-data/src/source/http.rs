//! HTTP-backed [`RecordSource`] for a single collection endpoint.
//!
//! Each query issues `GET {base_url}/{collection}?limit=N`, adding
//! `active=true` when the query asks for active records only. The endpoint
//! answers with a JSON array of the collection's own records, without a
//! `kind` tag; the source wraps them into [`SourceRecord`] variants.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use regionmap_core::{SourceKind, SourceRecord};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::decode::decode_untagged;
use super::{RecordSource, SourceError, SourceQuery};

/// Default user agent for collection requests.
pub const DEFAULT_USER_AGENT: &str = "regionmap/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for [`HttpRecordSource`] construction failures.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// The base URL did not parse or cannot carry path segments.
    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        base_url: String,
        /// Why the URL was rejected.
        reason: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Configuration for [`HttpRecordSource`].
#[derive(Debug, Clone)]
pub struct HttpRecordSourceConfig {
    /// Base URL of the content API (e.g. `"http://localhost:8080/api"`).
    pub base_url: String,
    /// Collection served by the endpoint.
    pub kind: SourceKind,
    /// Path segment appended to the base URL.
    pub collection: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpRecordSourceConfig {
    /// Configuration for `kind` under `base_url`, using the default
    /// collection path (`posts`, `businesses` or `events`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            base_url: base_url.into(),
            kind,
            collection: default_collection(kind).to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the collection path segment.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

const fn default_collection(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Post => "posts",
        SourceKind::Business => "businesses",
        SourceKind::Event => "events",
    }
}

/// Record source reading one collection over HTTP.
#[derive(Debug)]
pub struct HttpRecordSource {
    client: Client,
    base_url: Url,
    config: HttpRecordSourceConfig,
}

impl HttpRecordSource {
    /// Create a source for `kind` under `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>, kind: SourceKind) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpRecordSourceConfig::new(base_url, kind))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpRecordSourceConfig) -> Result<Self, SourceBuildError> {
        let invalid = |reason: String| SourceBuildError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(&config.base_url).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build the request URL for `query`.
    fn query_url(&self, query: &SourceQuery) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.config.collection);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            if query.active_only {
                pairs.append_pair("active", "true");
            }
        }
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> SourceError {
        if error.is_timeout() {
            return SourceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SourceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return SourceError::Parse {
                origin: url.to_owned(),
                message: error.to_string(),
            };
        }

        SourceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Decode a JSON array of `kind` records into tagged source records.
///
/// Only a body that is not a JSON array is an error.
fn decode_records(kind: SourceKind, body: &[u8]) -> Result<Vec<SourceRecord>, serde_json::Error> {
    let values = serde_json::from_slice::<Vec<serde_json::Value>>(body)?;
    Ok(decode_untagged(kind, values))
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    fn kind(&self) -> SourceKind {
        self.config.kind
    }

    async fn query(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, SourceError> {
        let url = self.query_url(query);
        debug!("fetching {} records from {url}", self.config.kind);
        let body = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        let mut records =
            decode_records(self.config.kind, &body).map_err(|err| SourceError::Parse {
                origin: url.to_string(),
                message: err.to_string(),
            })?;
        records.truncate(query.limit);
        Ok(records)
    }
}
