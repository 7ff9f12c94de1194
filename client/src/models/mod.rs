//! Domain models exchanged with the scheduling service.
//!
//! - [`schedule`]: baseline and optimization records, plus the enriched result
//! - [`etd`]: the estimated-time-of-departure request and response
//! - [`query`]: date ranges and request payloads

pub mod etd;
pub mod query;
pub mod schedule;

pub use etd::{EtdRequest, EtdResult};
pub use query::{DateRange, ScheduleQuery, SelectedScheduleQuery, ViewMode};
pub use schedule::{BaselineRecord, EnrichedResult, OptimizationEntity, ScheduleEntity};
