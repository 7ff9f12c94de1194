//! Single-flight request gate.
//!
//! Each independent pipeline (schedule operations, ETD calculation) owns one
//! [`RequestGate`]. At most one request per gate is in flight; a second
//! [`RequestGate::begin`] while busy is turned away with [`Rejected`] and is
//! not queued.
//!
//! ```text
//! Idle --begin--> InFlight --complete | fail | abandon--> Idle
//! ```
//!
//! Every accepted request gets a [`RequestToken`] carrying a fresh
//! cancellation signal and a generation number. Only the token of the
//! current generation can release the gate, so a request that was abandoned
//! and finishes late cannot disturb a newer one.

use parking_lot::Mutex;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::error::ChannelError;

/// Returned by [`RequestGate::begin`] when a request is already in flight.
///
/// This is a no-op signal, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

/// Proof of admission for one request.
#[derive(Debug)]
pub struct RequestToken {
    generation: u64,
    cancel: CancellationToken,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the request is canceled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

#[derive(Debug)]
struct ActiveRequest {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct ChannelState {
    active: Option<ActiveRequest>,
    last_error: Option<ChannelError>,
    next_generation: u64,
}

/// What [`RequestGate::complete_with`] did with a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion<R> {
    /// The update ran and the gate was released.
    Applied(R),
    /// The request was canceled before its result could be applied. The gate
    /// was released and the channel's canceled error recorded.
    Canceled,
    /// The token no longer owns the gate; nothing changed.
    Stale,
}

/// Point-in-time view of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub in_flight: bool,
    pub last_error: Option<ChannelError>,
}

/// At-most-one-in-flight guard with an owned cancellation token.
#[derive(Debug)]
pub struct RequestGate {
    name: &'static str,
    canceled_message: &'static str,
    state: Mutex<ChannelState>,
}

impl RequestGate {
    /// Gate for channel `name`; `canceled_message` is recorded whenever one
    /// of its requests is canceled.
    pub fn new(name: &'static str, canceled_message: &'static str) -> Self {
        Self {
            name,
            canceled_message,
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn canceled_message(&self) -> &'static str {
        self.canceled_message
    }

    /// Admit a new request, or reject it if one is already in flight.
    ///
    /// On admission the previous error is cleared.
    pub fn begin(&self) -> Result<RequestToken, Rejected> {
        let mut state = self.state.lock();
        if state.active.is_some() {
            return Err(Rejected);
        }

        state.next_generation += 1;
        let generation = state.next_generation;
        let cancel = CancellationToken::new();
        state.active = Some(ActiveRequest {
            generation,
            cancel: cancel.clone(),
        });
        state.last_error = None;

        Ok(RequestToken { generation, cancel })
    }

    /// Release the gate after a successful request.
    ///
    /// Returns `false` if the token is stale (the request was abandoned).
    pub fn complete(&self, token: RequestToken) -> bool {
        self.release(token, None)
    }

    /// Release the gate and record why the request failed.
    ///
    /// A stale token changes nothing, including the recorded error.
    pub fn fail(&self, token: RequestToken, error: ChannelError) -> bool {
        self.release(token, Some(error))
    }

    /// Run `apply` and release the gate, but only if `token` is still the
    /// current request and has not been canceled.
    ///
    /// Ownership and cancellation are checked under the gate lock, and
    /// `cancel`/`abandon` take the same lock, so a cancel either lands before
    /// the check (and `apply` is skipped) or after the gate is released (and
    /// is a no-op).
    pub fn complete_with<R>(
        &self,
        token: RequestToken,
        apply: impl FnOnce() -> R,
    ) -> Completion<R> {
        let mut state = self.state.lock();
        if !Self::owns(&state, &token) {
            return Completion::Stale;
        }

        state.active = None;
        if token.is_cancelled() {
            state.last_error = Some(ChannelError::Canceled(self.canceled_message.to_string()));
            return Completion::Canceled;
        }

        Completion::Applied(apply())
    }

    fn release(&self, token: RequestToken, error: Option<ChannelError>) -> bool {
        let mut state = self.state.lock();
        if !Self::owns(&state, &token) {
            return false;
        }

        state.active = None;
        if error.is_some() {
            state.last_error = error;
        }
        true
    }

    fn owns(state: &ChannelState, token: &RequestToken) -> bool {
        matches!(&state.active, Some(active) if active.generation == token.generation)
    }

    /// Signal the in-flight request to stop.
    ///
    /// The gate stays busy until the request observes the signal and
    /// releases it. Idempotent; returns `false` when nothing is in flight.
    pub fn cancel(&self) -> bool {
        let state = self.state.lock();
        match &state.active {
            Some(active) => {
                active.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the in-flight request and release the gate immediately.
    ///
    /// The abandoned request's token becomes stale, so its eventual
    /// completion records nothing.
    pub fn abandon(&self) -> bool {
        let mut state = self.state.lock();
        match state.active.take() {
            Some(active) => {
                active.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Record an error raised without going through `begin`.
    pub fn record_error(&self, error: ChannelError) {
        self.state.lock().last_error = Some(error);
    }

    pub fn clear_error(&self) {
        self.state.lock().last_error = None;
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.lock().active.is_some()
    }

    pub fn last_error(&self) -> Option<ChannelError> {
        self.state.lock().last_error.clone()
    }

    pub fn status(&self) -> ChannelStatus {
        let state = self.state.lock();
        ChannelStatus {
            in_flight: state.active.is_some(),
            last_error: state.last_error.clone(),
        }
    }
}
