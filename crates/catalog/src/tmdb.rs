//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::UpstreamFailure;
use crate::provider::CatalogSource;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// How requests are authenticated against the catalog.
#[derive(Clone, PartialEq)]
pub enum Credential {
    /// `Authorization: Bearer …` (API read access token). Preferred.
    Bearer(String),
    /// `?api_key=…` query parameter.
    ApiKey(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub credential: Option<Credential>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            credential: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct TmdbClient {
    credential: Option<Credential>,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            credential: config.credential.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_request(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<reqwest::Request, UpstreamFailure> {
        let credential = self
            .credential
            .as_ref()
            .ok_or(UpstreamFailure::Unauthorized)?;

        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(params);

        builder = match credential {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
        };

        builder
            .build()
            .map_err(|e| UpstreamFailure::malformed(format!("invalid catalog request: {e}")))
    }
}

#[async_trait::async_trait]
impl CatalogSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn fetch_resource(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamFailure> {
        let request = self.build_request(path, params)?;
        debug!(path, "TMDB request");

        let resp = self.client.execute(request).await.map_err(|e| {
            let failure = classify_transport(&e);
            warn!(path, error = %e, "TMDB request failed");
            failure
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            let failure = classify_transport(&e);
            warn!(path, status = status.as_u16(), error = %e, "TMDB response body unreadable");
            failure
        })?;

        if !status.is_success() {
            let failure = classify_status(status, &body);
            warn!(path, status = status.as_u16(), error = %failure, "TMDB returned an error");
            return Err(failure);
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(path, status = status.as_u16(), error = %e, "TMDB returned invalid JSON");
            UpstreamFailure::UpstreamError {
                status: Some(status.as_u16()),
                message: format!("parse JSON: {e}"),
            }
        })
    }
}

/// Map a non-success HTTP status (and its body) to a failure.
pub fn classify_status(status: StatusCode, body: &str) -> UpstreamFailure {
    match status {
        StatusCode::TOO_MANY_REQUESTS => UpstreamFailure::RateLimited,
        StatusCode::NOT_FOUND => UpstreamFailure::NotFound,
        _ => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v["status_message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("TMDB returned {status}"));
            UpstreamFailure::UpstreamError {
                status: Some(status.as_u16()),
                message,
            }
        }
    }
}

fn classify_transport(e: &reqwest::Error) -> UpstreamFailure {
    let message = if e.is_timeout() {
        "TMDB request timed out".to_string()
    } else {
        format!("network error: {e}")
    };
    UpstreamFailure::UpstreamError {
        status: e.status().map(|s| s.as_u16()),
        message,
    }
}
