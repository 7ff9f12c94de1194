//! Single-ship ETD calculation channel.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use super::{run_cancellable, settle_completion, settle_failure, RequestOutcome};
use crate::error::ChannelError;
use crate::gate::{ChannelStatus, RequestGate};
use crate::models::{EtdRequest, EtdResult};
use crate::transport::ScheduleApi;

/// Status text recorded when an ETD calculation is canceled.
pub const ETD_CANCELED_MESSAGE: &str = "ETD calculation was canceled.";

#[derive(Debug)]
struct EtdState {
    request: EtdRequest,
    result: Option<EtdResult>,
}

/// Owner of the editable ETD form and the last calculation result.
pub struct EtdController {
    api: Arc<dyn ScheduleApi>,
    gate: RequestGate,
    defaults: EtdRequest,
    state: RwLock<EtdState>,
}

impl EtdController {
    /// Controller whose default form is captured now.
    pub fn new(api: Arc<dyn ScheduleApi>) -> Self {
        Self::with_defaults(api, EtdRequest::default())
    }

    /// Controller that resets to `defaults`.
    pub fn with_defaults(api: Arc<dyn ScheduleApi>, defaults: EtdRequest) -> Self {
        Self {
            api,
            gate: RequestGate::new("etd", ETD_CANCELED_MESSAGE),
            state: RwLock::new(EtdState {
                request: defaults.clone(),
                result: None,
            }),
            defaults,
        }
    }

    /// The snapshot [`reset_etd_calculator`](Self::reset_etd_calculator) restores.
    pub fn defaults(&self) -> &EtdRequest {
        &self.defaults
    }

    pub fn etd_request(&self) -> EtdRequest {
        self.state.read().request.clone()
    }

    pub fn set_etd_request(&self, request: EtdRequest) {
        self.state.write().request = request;
    }

    /// Edit the working form in place.
    pub fn update_etd_request(&self, edit: impl FnOnce(&mut EtdRequest)) {
        edit(&mut self.state.write().request);
    }

    pub fn etd_result(&self) -> Option<EtdResult> {
        self.state.read().result.clone()
    }

    pub fn status(&self) -> ChannelStatus {
        self.gate.status()
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_in_flight()
    }

    pub fn last_error(&self) -> Option<ChannelError> {
        self.gate.last_error()
    }

    /// Signal the in-flight calculation to stop. No-op when idle.
    pub fn cancel_etd_request(&self) -> bool {
        self.gate.cancel()
    }

    /// Send the working form to the service and keep the response.
    ///
    /// The previous result is cleared as soon as the request is accepted.
    pub async fn calculate_etd(&self) -> RequestOutcome {
        let Ok(token) = self.gate.begin() else {
            debug!("Dropped ETD request: etd channel busy");
            return RequestOutcome::Rejected;
        };

        let request = {
            let mut state = self.state.write();
            state.result = None;
            state.request.clone()
        };
        info!("Calculating ETD for {}", request.ship_name);

        match run_cancellable(&token, self.api.calculate_etd(&request)).await {
            Ok(result) => {
                let completion = self
                    .gate
                    .complete_with(token, || self.state.write().result = Some(result));
                settle_completion(&self.gate, completion)
            }
            Err(err) => settle_failure(&self.gate, token, err),
        }
    }

    /// Restore the default form and clear the result and error.
    ///
    /// An in-flight calculation is canceled first and its late response is
    /// ignored.
    pub fn reset_etd_calculator(&self) {
        if self.gate.abandon() {
            info!("Abandoned in-flight ETD calculation on reset");
        }

        {
            let mut state = self.state.write();
            state.request = self.defaults.clone();
            state.result = None;
        }
        self.gate.clear_error();
    }
}
