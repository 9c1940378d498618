//! Request lifecycle for taxi trip queries.
//!
//! This crate owns everything around the single suspension point of the
//! pipeline: configuration, the remote [`source::TripSource`] seam with its
//! reqwest implementation, and the [`orchestrator::FetchOrchestrator`] state
//! machine that applies timeouts, cancellation and stale-response rejection
//! before handing records to `taxi_core`.

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod source;

pub use config::FetchConfig;
pub use error::{ConfigError, FetchError};
pub use orchestrator::{EmptyReason, FetchOrchestrator, FetchState, FetchTicket, Outcome};
pub use source::{HttpTripSource, TripSource};
