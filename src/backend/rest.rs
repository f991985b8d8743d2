use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;

use super::{Backend, BackendFailure, BackendResponse, Operation, Query};
use crate::config::settings::BackendConfig;
use crate::error::{AppError, AppResult};

const REST_PATH: &str = "rest/v1";
const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// PostgREST client authenticated with a project API key.
///
/// Holds a single `reqwest::Client`, so connection pooling, keep-alive and
/// TLS are whatever reqwest provides. No retries.
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
    bearer: HeaderValue,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .gzip(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Self::config_error("backend.client", e.into()))?;

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| Self::config_error("backend.api_key", e.into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| Self::config_error("backend.api_key", e.into()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
            bearer,
        })
    }

    fn config_error(key: &str, source: anyhow::Error) -> AppError {
        AppError::Configuration {
            key: key.to_string(),
            source,
        }
    }

    /// Resource URL for a query: table path, `select=*` and filters.
    pub(crate) fn endpoint(&self, query: &Query) -> AppResult<Url> {
        let raw = format!("{}/{}/{}", self.base_url, REST_PATH, query.table.as_str());
        let mut url = Url::parse(&raw).map_err(|e| Self::config_error("backend.url", e.into()))?;

        // Inserts return their rows through the Prefer header alone
        let mut pairs: Vec<(String, String)> = Vec::new();
        if !matches!(query.operation, Operation::Insert { .. }) {
            pairs.push(("select".to_string(), "*".to_string()));
        }
        for filter in &query.filters {
            pairs.push((filter.column().to_string(), filter.to_param()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Translate a query into a ready-to-send request.
    pub(crate) fn build_request(&self, query: &Query) -> AppResult<reqwest::Request> {
        let url = self.endpoint(query)?;
        let method = match query.operation {
            Operation::Select { .. } => Method::GET,
            Operation::Insert { .. } => Method::POST,
            Operation::Update { .. } => Method::PATCH,
            Operation::Delete => Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header("apikey", self.api_key.clone())
            .header(AUTHORIZATION, self.bearer.clone());

        builder = match &query.operation {
            Operation::Select { single: true } => builder.header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE),
            Operation::Select { single: false } => builder,
            Operation::Insert { rows } => builder.header("Prefer", RETURN_REPRESENTATION).json(rows),
            Operation::Update { values } => {
                builder.header("Prefer", RETURN_REPRESENTATION).json(values)
            }
            Operation::Delete => builder.header("Prefer", RETURN_REPRESENTATION),
        };

        builder
            .build()
            .map_err(|e| AppError::Internal { source: e.into() })
    }

    /// Turn a non-success body into the store's error object, falling back to
    /// the status line when the body is not the expected JSON.
    fn failure_from_body(status: reqwest::StatusCode, body: &str) -> BackendFailure {
        serde_json::from_str::<BackendFailure>(body).unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                BackendFailure::new(status.to_string()).with_code(status.as_str())
            } else {
                BackendFailure::new(trimmed).with_code(status.as_str())
            }
        })
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn execute(&self, query: Query) -> BackendResponse {
        let request = match self.build_request(&query) {
            Ok(request) => request,
            Err(e) => return BackendResponse::failed(e.to_string()),
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => return BackendResponse::failed(e.to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return BackendResponse::failed(e.to_string()),
        };

        if !status.is_success() {
            return BackendResponse::failure(Self::failure_from_body(status, &body));
        }

        if body.trim().is_empty() {
            return BackendResponse::ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(data) => BackendResponse::ok(data),
            Err(e) => BackendResponse::failed(format!("invalid JSON from {}: {}", query.table, e)),
        }
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
