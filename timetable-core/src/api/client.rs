//! Timetable API HTTP client.
//!
//! Provides async methods for the line detail, departures and banners
//! endpoints. Handles authentication, concurrency limiting, and conversion
//! to domain types.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Banner, Departure, Language, Line};
use crate::schedule::{DeparturesQuery, LineQuery, TimetableSource};

use super::convert::{convert_banners, convert_departures, convert_line};
use super::error::ApiError;
use super::types::{BannersResponse, DeparturesResponse, LineDto};

/// Default base URL for the timetable API.
const DEFAULT_BASE_URL: &str = "https://api.grad-vis.hr/timetable/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API key sent as `x-api-key`, if the deployment requires one
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Timetable API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TimetableClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| ApiError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn line_url(&self, query: &LineQuery) -> String {
        format!(
            "{}/{}/lines/{}",
            self.base_url,
            query.mode.as_str(),
            query.line_id
        )
    }

    fn departures_url(&self, query: &DeparturesQuery) -> String {
        format!(
            "{}/{}/lines/{}/departures",
            self.base_url,
            query.mode.as_str(),
            query.line_id
        )
    }

    fn banners_url(&self) -> String {
        format!("{}/banners", self.base_url)
    }

    /// GET a JSON document, mapping status codes to errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(url, "timetable request");

        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Fetch line detail in the given display language.
    pub async fn get_line(&self, query: &LineQuery) -> Result<Line, ApiError> {
        let dto: LineDto = self
            .get_json(
                &self.line_url(query),
                &[("lang", query.language.code().to_string())],
            )
            .await?;

        Ok(convert_line(&dto)?)
    }

    /// Fetch departures for one date and direction.
    pub async fn get_departures(&self, query: &DeparturesQuery) -> Result<Vec<Departure>, ApiError> {
        let resp: DeparturesResponse = self
            .get_json(
                &self.departures_url(query),
                &[
                    ("date", query.date.format("%Y-%m-%d").to_string()),
                    ("direction", query.direction.to_string()),
                    ("lang", query.language.code().to_string()),
                ],
            )
            .await?;

        Ok(convert_departures(&resp.departures))
    }

    /// Fetch banners for a screen context.
    pub async fn get_banners(&self, context: &str, language: Language) -> Result<Vec<Banner>, ApiError> {
        let resp: BannersResponse = self
            .get_json(
                &self.banners_url(),
                &[
                    ("context", context.to_string()),
                    ("lang", language.code().to_string()),
                ],
            )
            .await?;

        Ok(convert_banners(&resp.banners))
    }
}

impl TimetableSource for TimetableClient {
    async fn fetch_line(&self, query: &LineQuery) -> Result<Arc<Line>, ApiError> {
        self.get_line(query).await.map(Arc::new)
    }

    async fn fetch_departures(&self, query: &DeparturesQuery) -> Result<Arc<Vec<Departure>>, ApiError> {
        self.get_departures(query).await.map(Arc::new)
    }

    async fn fetch_banners(&self, context: &str, language: Language) -> Result<Vec<Banner>, ApiError> {
        self.get_banners(context, language).await
    }
}
