#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use baipot_client::models::{
    BaselineRecord, DateRange, EtdRequest, EtdResult, OptimizationEntity, ScheduleQuery,
    SelectedScheduleQuery,
};
use baipot_client::transport::{ScheduleApi, TransportResult};

static ENV_LOCK: StdMutex<()> = StdMutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A request the mock service received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(ScheduleQuery),
    Optimize(ScheduleQuery),
    OptimizeSelected(SelectedScheduleQuery),
    CalculateEtd(EtdRequest),
}

/// Scripted in-memory service.
///
/// Every call is recorded and answered with the configured response. With
/// `hold` enabled, calls signal `started` and then wait for `release`.
pub struct MockScheduleApi {
    calls: Mutex<Vec<Call>>,
    baseline: Mutex<TransportResult<Vec<BaselineRecord>>>,
    optimized: Mutex<TransportResult<Vec<OptimizationEntity>>>,
    etd: Mutex<TransportResult<EtdResult>>,
    hold: AtomicBool,
    pub started: Notify,
    pub release: Notify,
}

impl MockScheduleApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            baseline: Mutex::new(Ok(Vec::new())),
            optimized: Mutex::new(Ok(Vec::new())),
            etd: Mutex::new(Ok(EtdResult(json!({})))),
            hold: AtomicBool::new(false),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn with_baseline(self, records: Vec<BaselineRecord>) -> Self {
        *self.baseline.lock() = Ok(records);
        self
    }

    pub fn with_optimized(self, records: Vec<OptimizationEntity>) -> Self {
        *self.optimized.lock() = Ok(records);
        self
    }

    pub fn set_baseline(&self, response: TransportResult<Vec<BaselineRecord>>) {
        *self.baseline.lock() = response;
    }

    pub fn set_optimized(&self, response: TransportResult<Vec<OptimizationEntity>>) {
        *self.optimized.lock() = response;
    }

    pub fn set_etd(&self, response: TransportResult<EtdResult>) {
        *self.etd.lock() = response;
    }

    /// Make subsequent calls wait for `release` before answering.
    pub fn hold_responses(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    async fn answer<T: Clone>(&self, call: Call, response: &Mutex<TransportResult<T>>) -> TransportResult<T> {
        self.calls.lock().push(call);
        self.started.notify_one();
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        response.lock().clone()
    }
}

#[async_trait]
impl ScheduleApi for MockScheduleApi {
    async fn prepare(&self, query: &ScheduleQuery) -> TransportResult<Vec<BaselineRecord>> {
        self.answer(Call::Prepare(query.clone()), &self.baseline).await
    }

    async fn optimize(&self, query: &ScheduleQuery) -> TransportResult<Vec<OptimizationEntity>> {
        self.answer(Call::Optimize(query.clone()), &self.optimized).await
    }

    async fn optimize_selected(
        &self,
        query: &SelectedScheduleQuery,
    ) -> TransportResult<Vec<OptimizationEntity>> {
        self.answer(Call::OptimizeSelected(query.clone()), &self.optimized)
            .await
    }

    async fn calculate_etd(&self, request: &EtdRequest) -> TransportResult<EtdResult> {
        self.answer(Call::CalculateEtd(request.clone()), &self.etd).await
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn october_window() -> DateRange {
    DateRange::new(date(2025, 10, 1), date(2025, 10, 6))
}

pub fn ship(carrier: &str, vessel: &str, completion: f64, predicted: f64) -> BaselineRecord {
    BaselineRecord::new(carrier, vessel).with_metrics(completion, predicted)
}

pub fn sample_baseline() -> Vec<BaselineRecord> {
    vec![
        ship("COIS", "GLORY SHIP", 10.0, 5.0),
        ship("HMM", "HMM ALGECIRAS", 22.5, 14.0),
        ship("SKR", "SUNNY  OAK", 8.0, 3.5),
    ]
}

pub fn optimized(merge_key: &str, start_hours: f64) -> OptimizationEntity {
    let mut entity = OptimizationEntity::new(merge_key);
    entity.start_hours = Some(start_hours);
    entity
}
