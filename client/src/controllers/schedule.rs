//! Prepare / optimize / optimize-selected over one shared channel.

use std::future::Future;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use super::{run_cancellable, settle_completion, settle_failure, RequestOutcome};
use crate::config::{ClientConfig, ConfigError};
use crate::error::ChannelError;
use crate::gate::{ChannelStatus, RequestGate, RequestToken};
use crate::models::{
    DateRange, EnrichedResult, OptimizationEntity, ScheduleEntity, ScheduleQuery,
    SelectedScheduleQuery, ViewMode,
};
use crate::services::{reconcile, selection};
use crate::transport::{HttpScheduleApi, ScheduleApi, TransportResult};

/// Status text recorded when a schedule request is canceled.
pub const SCHEDULE_CANCELED_MESSAGE: &str = "Request was canceled.";

#[derive(Debug)]
struct ScheduleState {
    range: DateRange,
    baseline: Arc<Vec<ScheduleEntity>>,
    optimized: Option<Arc<Vec<EnrichedResult>>>,
    view_mode: ViewMode,
}

/// Owner of the baseline schedule and its optimization results.
///
/// Collections are handed out as `Arc` snapshots. Updates swap the whole
/// collection, so readers never see a partially applied response.
pub struct ScheduleController {
    api: Arc<dyn ScheduleApi>,
    gate: RequestGate,
    state: RwLock<ScheduleState>,
}

impl ScheduleController {
    pub fn new(api: Arc<dyn ScheduleApi>) -> Self {
        Self::with_range(api, DateRange::default())
    }

    pub fn with_range(api: Arc<dyn ScheduleApi>, range: DateRange) -> Self {
        Self {
            api,
            gate: RequestGate::new("schedule", SCHEDULE_CANCELED_MESSAGE),
            state: RwLock::new(ScheduleState {
                range,
                baseline: Arc::new(Vec::new()),
                optimized: None,
                view_mode: ViewMode::List,
            }),
        }
    }

    /// Controller talking HTTP to the configured service.
    ///
    /// # Errors
    /// Fails on an out-of-range `window_days` or if the HTTP client cannot be
    /// built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let range = config.date_range()?;
        let api = HttpScheduleApi::from_config(config)?;
        Ok(Self::with_range(Arc::new(api), range))
    }

    pub fn date_range(&self) -> DateRange {
        self.state.read().range
    }

    /// Replace the date range used by the next request.
    pub fn set_date_range(&self, range: DateRange) {
        self.state.write().range = range;
    }

    pub fn baseline(&self) -> Arc<Vec<ScheduleEntity>> {
        Arc::clone(&self.state.read().baseline)
    }

    pub fn optimization_results(&self) -> Option<Arc<Vec<EnrichedResult>>> {
        self.state.read().optimized.clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.read().view_mode
    }

    /// Switch back to the baseline list without touching any data.
    pub fn show_list_view(&self) {
        self.state.write().view_mode = ViewMode::List;
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

    /// Merge keys of the currently selected ships, in baseline order.
    pub fn selected_ships(&self) -> Vec<String> {
        selection::selected_keys(&self.state.read().baseline)
    }

    /// Flip the selection of the baseline entity at `index`.
    ///
    /// Returns `false` if there is no such entity. Readers holding an older
    /// snapshot keep seeing the collection they were given.
    pub fn toggle_selection(&self, index: usize) -> bool {
        let mut state = self.state.write();
        let baseline: &mut Vec<ScheduleEntity> = Arc::make_mut(&mut state.baseline);
        selection::toggle(baseline, index)
    }

    /// Signal the in-flight schedule request to stop. No-op when idle.
    pub fn cancel_request(&self) -> bool {
        self.gate.cancel()
    }

    /// Fetch the baseline for the current date range.
    ///
    /// On success the baseline is replaced, previous optimization results are
    /// dropped and the view returns to the list.
    pub async fn prepare_schedule(&self) -> RequestOutcome {
        let Some(token) = self.admit("prepare") else {
            return RequestOutcome::Rejected;
        };
        let query = ScheduleQuery::from(self.date_range());

        match run_cancellable(&token, self.api.prepare(&query)).await {
            Ok(records) => {
                let baseline: Vec<ScheduleEntity> =
                    records.into_iter().map(ScheduleEntity::ingest).collect();
                let count = baseline.len();

                let outcome = self.apply(token, move |state| {
                    state.baseline = Arc::new(baseline);
                    state.optimized = None;
                    state.view_mode = ViewMode::List;
                });
                if outcome == RequestOutcome::Completed {
                    info!("Prepared baseline with {} ships", count);
                }
                outcome
            }
            Err(err) => settle_failure(&self.gate, token, err),
        }
    }

    /// Optimize every ship in the current date range.
    pub async fn optimize_all(&self) -> RequestOutcome {
        let Some(token) = self.admit("optimize") else {
            return RequestOutcome::Rejected;
        };
        let query = ScheduleQuery::from(self.date_range());

        self.finish_optimization(token, self.api.optimize(&query))
            .await
    }

    /// Optimize only the selected ships.
    ///
    /// With nothing selected a validation error is recorded and no request is
    /// sent.
    pub async fn optimize_selected(&self) -> RequestOutcome {
        let selected_ships = self.selected_ships();
        if selected_ships.is_empty() {
            self.gate.record_error(ChannelError::empty_selection());
            return RequestOutcome::Failed;
        }

        let Some(token) = self.admit("optimize-selected") else {
            return RequestOutcome::Rejected;
        };
        let query = SelectedScheduleQuery {
            range: ScheduleQuery::from(self.date_range()),
            selected_ships,
        };

        self.finish_optimization(token, self.api.optimize_selected(&query))
            .await
    }

    fn admit(&self, operation: &str) -> Option<RequestToken> {
        match self.gate.begin() {
            Ok(token) => {
                info!("Starting {} request", operation);
                Some(token)
            }
            Err(_) => {
                debug!("Dropped {} request: schedule channel busy", operation);
                None
            }
        }
    }

    async fn finish_optimization<F>(&self, token: RequestToken, call: F) -> RequestOutcome
    where
        F: Future<Output = TransportResult<Vec<OptimizationEntity>>>,
    {
        match run_cancellable(&token, call).await {
            Ok(optimized) => {
                let baseline = self.baseline();
                let enriched = reconcile(&optimized, &baseline);
                let matched = enriched.iter().filter(|r| r.is_enriched()).count();
                info!(
                    "Optimization returned {} ships ({} matched to baseline)",
                    enriched.len(),
                    matched
                );

                self.apply(token, move |state| {
                    state.optimized = Some(Arc::new(enriched));
                    state.view_mode = ViewMode::Chart;
                })
            }
            Err(err) => settle_failure(&self.gate, token, err),
        }
    }

    fn apply(&self, token: RequestToken, update: impl FnOnce(&mut ScheduleState)) -> RequestOutcome {
        let completion = self
            .gate
            .complete_with(token, || update(&mut self.state.write()));
        settle_completion(&self.gate, completion)
    }
}
