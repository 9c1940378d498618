//! User-facing filter values for selecting trips from the 2014 dataset.
//!
//! A [`FilterState`] is replaced wholesale on every edit. The builders here
//! clamp out-of-range input instead of rejecting it, so any value handed to the
//! query pipeline is already structurally valid.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive bounds of the fare slider, in dollars.
pub const FARE_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Inclusive bounds of the distance slider, in miles.
pub const DISTANCE_BOUNDS: (f64, f64) = (0.0, 30.0);

/// Calendar year covered by the dataset.
pub const DATASET_YEAR: i32 = 2014;

/// Payment code the remote source uses for cash trips.
pub const CASH_CODE: &str = "CSH";

/// Payment code the remote source uses for card trips.
pub const CARD_CODE: &str = "CRD";

const FILTER_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid filter time '{0}'")]
    InvalidTime(String),
    #[error("unknown payment type '{0}'")]
    UnknownPayment(String),
}

/// Payment selection. `All` adds no clause to the remote query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter {
    #[default]
    All,
    Cash,
    Card,
}

impl PaymentFilter {
    /// Remote payment code, or `None` when every payment type matches.
    pub fn code(self) -> Option<&'static str> {
        match self {
            PaymentFilter::All => None,
            PaymentFilter::Cash => Some(CASH_CODE),
            PaymentFilter::Card => Some(CARD_CODE),
        }
    }
}

impl std::str::FromStr for PaymentFilter {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(PaymentFilter::All)
        } else if trimmed.eq_ignore_ascii_case("cash") || trimmed.eq_ignore_ascii_case(CASH_CODE) {
            Ok(PaymentFilter::Cash)
        } else if trimmed.eq_ignore_ascii_case("card") || trimmed.eq_ignore_ascii_case(CARD_CODE) {
            Ok(PaymentFilter::Card)
        } else {
            Err(FilterError::UnknownPayment(value.to_string()))
        }
    }
}

/// Closed numeric range with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Build a range clamped into `bounds`, swapping the ends if they arrive reversed.
    pub fn clamped(min: f64, max: f64, bounds: (f64, f64)) -> Self {
        let (low, high) = bounds;
        let clamp = |value: f64| {
            if value.is_nan() {
                low
            } else {
                value.clamp(low, high)
            }
        };
        let (min, max) = (clamp(min), clamp(max));
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The complete set of filters for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub time: NaiveDateTime,
    pub fare: ValueRange,
    pub distance: ValueRange,
    pub payment: PaymentFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            time: default_filter_time(),
            fare: ValueRange {
                min: FARE_BOUNDS.0,
                max: FARE_BOUNDS.1,
            },
            distance: ValueRange {
                min: DISTANCE_BOUNDS.0,
                max: DISTANCE_BOUNDS.1,
            },
            payment: PaymentFilter::All,
        }
    }
}

impl FilterState {
    pub fn with_time(mut self, time: NaiveDateTime) -> Self {
        self.time = clamp_to_dataset_year(time);
        self
    }

    pub fn with_fare(mut self, min: f64, max: f64) -> Self {
        self.fare = ValueRange::clamped(min, max, FARE_BOUNDS);
        self
    }

    pub fn with_distance(mut self, min: f64, max: f64) -> Self {
        self.distance = ValueRange::clamped(min, max, DISTANCE_BOUNDS);
        self
    }

    pub fn with_payment(mut self, payment: PaymentFilter) -> Self {
        self.payment = payment;
        self
    }
}

/// A weekday morning in mid January, which reliably has trips.
pub fn default_filter_time() -> NaiveDateTime {
    dataset_date(1, 15).and_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Earliest selectable moment.
pub fn dataset_start() -> NaiveDateTime {
    dataset_date(1, 1).and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Latest selectable moment.
pub fn dataset_end() -> NaiveDateTime {
    dataset_date(12, 31).and_hms_opt(23, 59, 59).unwrap_or_default()
}

fn dataset_date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(DATASET_YEAR, month, day).unwrap_or_default()
}

/// Clamp a moment onto the dataset year boundaries.
pub fn clamp_to_dataset_year(time: NaiveDateTime) -> NaiveDateTime {
    time.clamp(dataset_start(), dataset_end())
}

/// Parse a `datetime-local` style value (`YYYY-MM-DDTHH:MM[:SS[.fff]]`) and clamp it
/// to the dataset year. Sub-second precision is discarded.
pub fn parse_filter_time(input: &str) -> Result<NaiveDateTime, FilterError> {
    let trimmed = input.trim();
    FILTER_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .and_then(|time| time.with_nanosecond(0))
        .map(clamp_to_dataset_year)
        .ok_or_else(|| FilterError::InvalidTime(input.to_string()))
}
