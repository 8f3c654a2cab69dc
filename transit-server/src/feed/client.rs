//! Tranzy open-data API client.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn};

use super::error::FeedError;
use super::record::Record;
use super::snapshot::{FeedSnapshot, Section};

/// Default base URL for the Tranzy open-data API.
const DEFAULT_BASE_URL: &str = "https://api.tranzy.ai/v1/opendata";

/// Default agency (Cluj-Napoca).
const DEFAULT_AGENCY_ID: &str = "2";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// API key for the X-API-KEY header
    pub api_key: String,
    /// Agency for the X-Agency-Id header
    pub agency_id: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Request timeout for the (much larger) shapes section
    pub shapes_timeout_secs: u64,
}

impl FeedClientConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agency_id: DEFAULT_AGENCY_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            shapes_timeout_secs: 60,
        }
    }

    /// Set the agency id.
    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = agency_id.into();
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the Tranzy open-data API.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    shapes_timeout: Duration,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        if config.api_key.trim().is_empty() {
            return Err(FeedError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| FeedError::Api {
            section: "config",
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        let agency = HeaderValue::from_str(&config.agency_id).map_err(|_| FeedError::Api {
            section: "config",
            status: 0,
            message: "Invalid agency id format".to_string(),
        })?;
        headers.insert(HeaderName::from_static("x-api-key"), api_key);
        headers.insert(HeaderName::from_static("x-agency-id"), agency);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            shapes_timeout: Duration::from_secs(config.shapes_timeout_secs),
        })
    }

    /// Fetch one section of the feed.
    pub async fn fetch_section(&self, section: Section) -> Result<Vec<Record>, FeedError> {
        let url = format!("{}/{}", self.base_url, section.as_str());
        let timeout = match section {
            Section::Shapes => self.shapes_timeout,
            _ => self.timeout,
        };

        let response = self.http.get(&url).timeout(timeout).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                section: section.as_str(),
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let records: Vec<Record> = serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: format!("{}: {}", section, e),
        })?;

        info!(section = %section, records = records.len(), "Fetched feed section");
        Ok(records)
    }

    /// Fetch every section into a snapshot.
    ///
    /// Stops and routes are required; a failure fetching trips, stop times
    /// or shapes is logged and leaves that section empty so the graph can
    /// still be built from whatever is available.
    pub async fn fetch_snapshot(&self) -> Result<FeedSnapshot, FeedError> {
        let mut snapshot = FeedSnapshot::default();

        for section in Section::ALL {
            match self.fetch_section(section).await {
                Ok(records) => *snapshot.section_mut(section) = records,
                Err(e) if !section.is_required() => {
                    warn!(section = %section, error = %e, "Optional feed section unavailable");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(snapshot)
    }
}
