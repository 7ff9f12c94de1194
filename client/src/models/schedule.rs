//! Schedule records returned by the `prepare` and `optimize` capabilities.
//!
//! Records keep every field the service sends. Only the fields the client
//! actually reasons about are typed; everything else rides along in `extra`
//! and is re-emitted unchanged on serialization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::services::merge_key::derive_merge_key;

/// JSON key of the completion metric copied onto enriched results.
pub const ORIGINAL_COMPLETION_KEY: &str = "original_Completion_h";
/// JSON key of the predicted work time copied onto enriched results.
pub const PREDICTED_WORK_TIME_KEY: &str = "predicted_work_time";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A baseline row exactly as the `prepare` capability returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    /// Shipping line operating the call
    #[serde(rename = "선사", default, deserialize_with = "null_as_default")]
    pub carrier: String,
    #[serde(rename = "선명", default, deserialize_with = "null_as_default")]
    pub vessel_name: String,
    #[serde(rename = "Completion_h", default, skip_serializing_if = "Option::is_none")]
    pub completion_hours: Option<f64>,
    /// Model-predicted berth work time, in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_work_time: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BaselineRecord {
    pub fn new(carrier: impl Into<String>, vessel_name: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            vessel_name: vessel_name.into(),
            completion_hours: None,
            predicted_work_time: None,
            extra: Map::new(),
        }
    }

    pub fn with_metrics(mut self, completion_hours: f64, predicted_work_time: f64) -> Self {
        self.completion_hours = Some(completion_hours);
        self.predicted_work_time = Some(predicted_work_time);
        self
    }
}

/// An ingested baseline row: the service record plus its selection flag and
/// merge key.
///
/// The merge key is derived once in [`ScheduleEntity::ingest`] and cannot be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntity {
    #[serde(flatten)]
    record: BaselineRecord,
    pub selected: bool,
    merge_key: String,
}

impl ScheduleEntity {
    /// Attach `selected = false` and the derived merge key to a service record.
    pub fn ingest(mut record: BaselineRecord) -> Self {
        // The attached fields own these names on output.
        record.extra.remove("selected");
        record.extra.remove("merge_key");
        let merge_key = derive_merge_key(&record.carrier, &record.vessel_name);
        Self {
            record,
            selected: false,
            merge_key,
        }
    }

    pub fn merge_key(&self) -> &str {
        &self.merge_key
    }

    pub fn record(&self) -> &BaselineRecord {
        &self.record
    }

    pub fn carrier(&self) -> &str {
        &self.record.carrier
    }

    pub fn vessel_name(&self) -> &str {
        &self.record.vessel_name
    }

    pub fn completion_hours(&self) -> Option<f64> {
        self.record.completion_hours
    }

    pub fn predicted_work_time(&self) -> Option<f64> {
        self.record.predicted_work_time
    }
}

/// One ship's slot in an optimized berth plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationEntity {
    /// Identity computed by the service; must follow the client's derivation rule
    #[serde(default, deserialize_with = "null_as_default")]
    pub merge_key: String,
    #[serde(rename = "Ship", default, skip_serializing_if = "Option::is_none")]
    pub ship: Option<String>,
    #[serde(rename = "Ship_ID", default, skip_serializing_if = "Option::is_none")]
    pub ship_id: Option<i64>,
    #[serde(rename = "Arrival_h", default, skip_serializing_if = "Option::is_none")]
    pub arrival_hours: Option<f64>,
    #[serde(rename = "Start_h", default, skip_serializing_if = "Option::is_none")]
    pub start_hours: Option<f64>,
    #[serde(rename = "Completion_h", default, skip_serializing_if = "Option::is_none")]
    pub completion_hours: Option<f64>,
    #[serde(rename = "Waiting_h", default, skip_serializing_if = "Option::is_none")]
    pub waiting_hours: Option<f64>,
    #[serde(rename = "Service_h", default, skip_serializing_if = "Option::is_none")]
    pub service_hours: Option<f64>,
    #[serde(rename = "Length_m", default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    /// Berth position of the bow, in metres from the quay origin
    #[serde(rename = "Position_m", default, skip_serializing_if = "Option::is_none")]
    pub position_m: Option<f64>,
    #[serde(rename = "End_Position_m", default, skip_serializing_if = "Option::is_none")]
    pub end_position_m: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptimizationEntity {
    pub fn new(merge_key: impl Into<String>) -> Self {
        Self {
            merge_key: merge_key.into(),
            ship: None,
            ship_id: None,
            arrival_hours: None,
            start_hours: None,
            completion_hours: None,
            waiting_hours: None,
            service_hours: None,
            length_m: None,
            position_m: None,
            end_position_m: None,
            extra: Map::new(),
        }
    }
}

/// An optimization record, optionally carrying fields copied from its
/// baseline match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub optimized: OptimizationEntity,
    #[serde(rename = "original_Completion_h", skip_serializing_if = "Option::is_none")]
    pub original_completion_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_work_time: Option<f64>,
    #[serde(skip)]
    matched: bool,
}

impl EnrichedResult {
    /// Wrap a record that had no baseline match. Nothing is added.
    pub fn passthrough(optimized: OptimizationEntity) -> Self {
        Self {
            optimized,
            original_completion_hours: None,
            predicted_work_time: None,
            matched: false,
        }
    }

    /// Copy the baseline metrics onto an optimization record.
    ///
    /// Copied values replace any same-named key the service already sent.
    pub fn enrich(mut optimized: OptimizationEntity, baseline: &ScheduleEntity) -> Self {
        optimized.extra.remove(ORIGINAL_COMPLETION_KEY);
        optimized.extra.remove(PREDICTED_WORK_TIME_KEY);
        Self {
            optimized,
            original_completion_hours: baseline.completion_hours(),
            predicted_work_time: baseline.predicted_work_time(),
            matched: true,
        }
    }

    /// Whether a baseline entity with the same merge key was found.
    pub fn is_enriched(&self) -> bool {
        self.matched
    }

    pub fn merge_key(&self) -> &str {
        &self.optimized.merge_key
    }
}
