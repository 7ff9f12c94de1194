//! Channel-local error state.
//!
//! Every failure on a channel ends up here, converted once at the channel
//! boundary. The presentation layer reads these; nothing is returned as a
//! `Result` from controller operations.

use serde::Serialize;

use crate::transport::TransportError;

/// Message shown when `optimize-selected` is requested with nothing selected.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one ship to optimize.";

/// Coarse classification of a [`ChannelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Canceled,
    TransportOrServer,
}

/// Error recorded on a channel after a failed or aborted operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The request was refused locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// The in-flight request was canceled on purpose.
    #[error("{0}")]
    Canceled(String),

    /// The transport or the remote service reported a failure.
    #[error("Error: {0}")]
    Failure(String),
}

impl ChannelError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn empty_selection() -> Self {
        Self::Validation(EMPTY_SELECTION_MESSAGE.to_string())
    }

    /// Convert a transport failure, using `canceled_message` for aborts.
    ///
    /// The service-provided detail wins over the transport description.
    pub fn from_transport(err: &TransportError, canceled_message: &str) -> Self {
        match err {
            TransportError::Canceled => Self::Canceled(canceled_message.to_string()),
            other => Self::Failure(other.user_detail()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Canceled(_) => ErrorKind::Canceled,
            Self::Failure(_) => ErrorKind::TransportOrServer,
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.kind() == ErrorKind::Canceled
    }

    /// The text to show the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
