//! Estimated-time-of-departure request and response.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Vessel particulars sent to the `calculate-etd` capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtdRequest {
    pub ship_name: String,
    /// Estimated time of arrival
    pub eta: DateTime<Utc>,
    /// Containers to load, in TEU
    pub cargo_load: f64,
    /// Containers to discharge, in TEU
    pub cargo_unload: f64,
    /// Length overall, in metres
    pub ship_length: f64,
    pub shipping_company: String,
    pub gross_tonnage: f64,
    /// Gang shift duration, in minutes
    pub shift: f64,
}

impl EtdRequest {
    /// The form values a fresh calculator starts from, with the arrival three
    /// days after `now`.
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            ship_name: "GLORY COIS".to_string(),
            eta: now + Duration::days(3),
            cargo_load: 300.0,
            cargo_unload: 300.0,
            ship_length: 150.0,
            shipping_company: "COIS COMPANY".to_string(),
            gross_tonnage: 3000.0,
            shift: 150.0,
        }
    }
}

impl Default for EtdRequest {
    fn default() -> Self {
        Self::default_at(Utc::now())
    }
}

/// Response of the `calculate-etd` capability, kept as the service sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EtdResult(pub Value);

impl EtdResult {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
