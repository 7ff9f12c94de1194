//! # BAIPOT Client
//!
//! Request lifecycle and result reconciliation for the BAIPOT berth
//! scheduling service.
//!
//! The client drives a two-stage workflow: fetch a baseline schedule for a
//! date range, then submit all of it (or a selected subset) for optimization
//! and merge the optimized plan back onto the baseline metrics. A separate
//! channel computes the estimated time of departure for a single ship.
//!
//! ## Architecture
//!
//! - [`services`]: merge key derivation, reconciliation and selection (pure)
//! - [`gate`]: single-flight request gate with cancellation tokens
//! - [`controllers`]: the schedule and ETD channels
//! - [`transport`]: the [`transport::ScheduleApi`] seam and its reqwest implementation
//! - [`models`]: wire and domain records
//! - [`config`]: environment and TOML configuration
//! - [`error`]: channel-local error state
//!
//! ## Concurrency
//!
//! Each channel admits one request at a time; concurrent attempts are dropped,
//! never queued. Controllers are `Send + Sync` and are meant to be shared via
//! `Arc`, so a cancel can be issued from another task while a request awaits
//! the network.

pub mod config;
pub mod controllers;
pub mod error;
pub mod gate;
pub mod models;
pub mod services;
pub mod transport;

pub use config::ClientConfig;
pub use controllers::{EtdController, RequestOutcome, ScheduleController};
pub use error::{ChannelError, ErrorKind};
pub use gate::{ChannelStatus, Completion, Rejected, RequestGate, RequestToken};
