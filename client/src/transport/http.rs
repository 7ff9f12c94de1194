//! reqwest-backed [`ScheduleApi`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ScheduleApi, TransportError, TransportResult};
use crate::config::ClientConfig;
use crate::models::{
    BaselineRecord, EtdRequest, EtdResult, OptimizationEntity, ScheduleQuery, SelectedScheduleQuery,
};

pub const PREPARE_PATH: &str = "/schedule/prepare";
pub const OPTIMIZE_PATH: &str = "/schedule/optimize";
pub const OPTIMIZE_SELECTED_PATH: &str = "/schedule/optimize-selected";
pub const CALCULATE_ETD_PATH: &str = "/schedule/calculate-etd";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Pull a displayable `detail` out of an error body.
///
/// String details are returned as is; structured ones (validation error
/// arrays) are returned as JSON text.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// HTTP client for the scheduling service.
#[derive(Debug, Clone)]
pub struct HttpScheduleApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScheduleApi {
    /// Wrap an existing client. A trailing `/` on `base_url` is ignored.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client from configuration, applying the optional timeout.
    pub fn from_config(config: &ClientConfig) -> TransportResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> TransportResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!("POST {} failed ({}): {}", url, status, text.trim());
            return Err(TransportError::status(status.as_u16(), error_detail(&text)));
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn prepare(&self, query: &ScheduleQuery) -> TransportResult<Vec<BaselineRecord>> {
        self.post_json(PREPARE_PATH, query).await
    }

    async fn optimize(&self, query: &ScheduleQuery) -> TransportResult<Vec<OptimizationEntity>> {
        self.post_json(OPTIMIZE_PATH, query).await
    }

    async fn optimize_selected(
        &self,
        query: &SelectedScheduleQuery,
    ) -> TransportResult<Vec<OptimizationEntity>> {
        self.post_json(OPTIMIZE_SELECTED_PATH, query).await
    }

    async fn calculate_etd(&self, request: &EtdRequest) -> TransportResult<EtdResult> {
        self.post_json(CALCULATE_ETD_PATH, request).await
    }
}
