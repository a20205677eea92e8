//! HTTP client for a Nominatim-compatible place search endpoint.
//!
//! Wraps `reqwest` with a fixed user agent and timeout, retries transient
//! failures, and turns the loosely-typed result rows into [`Place`] values,
//! skipping rows without usable coordinates.

use std::time::Duration;

use localpin_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;
use crate::types::{NominatimPlace, Place};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const DEFAULT_USER_AGENT: &str = "localpin/0.1 (vendor-discovery)";
const DEFAULT_LIMIT: usize = 5;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Shortest query, in characters after trimming, that is sent upstream.
pub const MIN_QUERY_CHARS: usize = 4;

/// Client for place-name search.
///
/// Use [`GeocodeClient::new`] for the public Nominatim instance,
/// [`GeocodeClient::from_config`] for a configured one, or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    search_url: Url,
    api_key: Option<String>,
    limit: usize,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeocodeClient {
    /// Creates a client for the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_USER_AGENT, timeout_secs)
    }

    /// Creates a client against `base_url`; searches go to `{base_url}/search`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_url,
            api_key: None,
            limit: DEFAULT_LIMIT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Creates a client from the `LOCALPIN_GEOCODER_*` settings.
    ///
    /// # Errors
    ///
    /// Same as [`GeocodeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let client = Self::with_base_url(
            &config.geocoder_url,
            &config.geocoder_user_agent,
            config.geocoder_timeout_secs,
        )?
        .with_limit(config.geocoder_result_limit)
        .with_retries(config.geocoder_max_retries, DEFAULT_BACKOFF_BASE_MS);

        Ok(match &config.geocoder_api_key {
            Some(key) => client.with_api_key(key),
            None => client,
        })
    }

    /// Sends `key=<api_key>` with every request, for hosted Nominatim services.
    #[must_use]
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_owned());
        self
    }

    /// Maximum number of results requested; at least 1.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Searches for places matching `text`.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] after trimming return an empty
    /// list without contacting the server. Result rows whose coordinates do
    /// not parse are skipped.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status,
    ///   after retries are exhausted.
    /// - [`GeocodeError::Deserialize`] if the response is not a JSON array.
    pub async fn search(&self, text: &str) -> Result<Vec<Place>, GeocodeError> {
        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            tracing::debug!(query, "place query too short, skipping search");
            return Ok(Vec::new());
        }

        let url = self.build_url(query);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move { self.request_json(&url).await }
        })
        .await?;

        let rows: Vec<serde_json::Value> =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;
        let total = rows.len();

        let places: Vec<Place> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<NominatimPlace>(row).ok())
            .filter_map(NominatimPlace::into_place)
            .collect();

        if places.len() < total {
            tracing::debug!(
                query,
                skipped = total - places.len(),
                "geocoder rows without usable coordinates skipped"
            );
        }
        Ok(places)
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("q", query);
            pairs.append_pair("limit", &self.limit.to_string());
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body as
    /// JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
