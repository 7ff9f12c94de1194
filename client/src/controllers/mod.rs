//! Channel orchestration.
//!
//! A controller owns one [`RequestGate`] and the state its requests produce.
//! Operations never return errors: failures are recorded on the channel and
//! the operation reports a [`RequestOutcome`].

pub mod etd;
pub mod schedule;

use std::future::Future;

use log::{debug, info, warn};

use crate::error::ChannelError;
use crate::gate::{Completion, RequestGate, RequestToken};
use crate::transport::{TransportError, TransportResult};

pub use etd::EtdController;
pub use schedule::ScheduleController;

/// How a controller operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The response was applied to the controller state.
    Completed,
    /// Another request was in flight; nothing happened.
    Rejected,
    /// The request was canceled and its response discarded.
    Canceled,
    /// A validation, transport or server error was recorded.
    Failed,
}

/// Race a transport call against the token's cancellation signal.
///
/// Losing the race drops `call`, which aborts the underlying transport
/// operation. A response that arrives after cancellation is discarded.
pub(crate) async fn run_cancellable<T, F>(token: &RequestToken, call: F) -> TransportResult<T>
where
    F: Future<Output = TransportResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(TransportError::Canceled),
        result = call => {
            if token.is_cancelled() {
                Err(TransportError::Canceled)
            } else {
                result
            }
        }
    }
}

/// Record a transport failure on `gate` and release it.
pub(crate) fn settle_failure(
    gate: &RequestGate,
    token: RequestToken,
    err: TransportError,
) -> RequestOutcome {
    let error = ChannelError::from_transport(&err, gate.canceled_message());
    let outcome = if error.is_canceled() {
        info!("{} request canceled", gate.name());
        RequestOutcome::Canceled
    } else {
        warn!("{} request failed: {}", gate.name(), err);
        RequestOutcome::Failed
    };

    if !gate.fail(token, error) {
        debug!("{} request finished after being abandoned", gate.name());
    }
    outcome
}

/// Map the result of applying a response to the operation outcome.
///
/// A response discarded because its request was canceled or abandoned is
/// reported as `Canceled` on every channel.
pub(crate) fn settle_completion<R>(gate: &RequestGate, completion: Completion<R>) -> RequestOutcome {
    match completion {
        Completion::Applied(_) => RequestOutcome::Completed,
        Completion::Canceled => {
            info!("{} request canceled before its response was applied", gate.name());
            RequestOutcome::Canceled
        }
        Completion::Stale => {
            debug!("Discarded {} response for an abandoned request", gate.name());
            RequestOutcome::Canceled
        }
    }
}
