//! Remote scheduling service seam.
//!
//! Controllers talk to the service only through [`ScheduleApi`]. The HTTP
//! implementation lives in [`http`]; tests substitute their own.

pub mod http;

use async_trait::async_trait;

use crate::models::{
    BaselineRecord, EtdRequest, EtdResult, OptimizationEntity, ScheduleQuery, SelectedScheduleQuery,
};

pub use http::HttpScheduleApi;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure of a single round trip to the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The caller aborted the request before it finished.
    #[error("Request was canceled")]
    Canceled,

    /// The service answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        /// `detail` field of the error body, if the service sent one
        detail: Option<String>,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self::Status { status, detail }
    }

    /// Text for the user: the service detail when present, otherwise the
    /// transport description.
    pub fn user_detail(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// The four capabilities of the scheduling service.
///
/// Implementations need not watch for cancellation themselves: controllers
/// drop the returned future when a request is canceled.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Fetch the baseline schedule for a date range.
    async fn prepare(&self, query: &ScheduleQuery) -> TransportResult<Vec<BaselineRecord>>;

    /// Optimize every ship in the date range.
    async fn optimize(&self, query: &ScheduleQuery) -> TransportResult<Vec<OptimizationEntity>>;

    /// Optimize only the ships whose merge keys are listed.
    async fn optimize_selected(
        &self,
        query: &SelectedScheduleQuery,
    ) -> TransportResult<Vec<OptimizationEntity>>;

    async fn calculate_etd(&self, request: &EtdRequest) -> TransportResult<EtdResult>;
}
