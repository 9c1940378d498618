//! Query-and-aggregation pipeline for the 2014 NYC yellow taxi trip dataset.
//!
//! This crate owns the pure parts of the pipeline: filter values, the pickup
//! time window, remote query encoding, record normalization, display sampling
//! and the chart aggregations. It does no I/O; the request lifecycle lives in
//! `taxi_fetch`.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use taxi_core::{normalize_records, FilterState, ResultBundle, TripQuery, DISPLAY_CAP};
//!
//! let query = TripQuery::from_filters(&FilterState::default());
//! assert!(query.where_clause.starts_with("pickup_datetime >= '2014-01-15T07:00:00.000'"));
//!
//! let set = normalize_records(&[]);
//! let bundle = ResultBundle::assemble(&set, DISPLAY_CAP, &mut StdRng::seed_from_u64(1));
//! assert_eq!(bundle.total_valid_count, 0);
//! ```

pub mod aggregate;
pub mod bundle;
pub mod filters;
pub mod normalize;
pub mod query;
pub mod record;
pub mod sample;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod time_window;

pub use aggregate::{summarize, TripSummary};
pub use bundle::ResultBundle;
pub use filters::{FilterError, FilterState, PaymentFilter, ValueRange};
pub use normalize::{normalize_records, NormalizedSet};
pub use query::TripQuery;
pub use record::{NormalizedTrip, RawTripRecord};
pub use sample::{sample_trips, TripSample, DISPLAY_CAP};
pub use time_window::TimeWindow;
