//! Raw and normalized trip records.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PICKUP_LATITUDE: &str = "pickup_latitude";
pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const PICKUP_DATETIME: &str = "pickup_datetime";
pub const PAYMENT_TYPE: &str = "payment_type";

const PICKUP_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Untrusted record as returned by the remote source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTripRecord(pub Map<String, Value>);

impl RawTripRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field as a finite number; accepts JSON numbers and numeric strings.
    pub fn number(&self, field: &str) -> Option<f64> {
        let value = match self.get(field)? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field)? {
            Value::String(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RawTripRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A record whose coordinates, fare and distance all parsed to finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrip {
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub fare_amount: f64,
    pub trip_distance: f64,
    pub pickup_datetime: Option<NaiveDateTime>,
    pub payment_type: Option<String>,
}

impl NormalizedTrip {
    /// Hour of day (0-23) of the pickup, when the timestamp parsed.
    pub fn pickup_hour(&self) -> Option<u32> {
        self.pickup_datetime.map(|time| time.hour())
    }

    pub fn pickup(&self) -> (f64, f64) {
        (self.pickup_latitude, self.pickup_longitude)
    }

    pub fn dropoff(&self) -> (f64, f64) {
        (self.dropoff_latitude, self.dropoff_longitude)
    }
}

/// Parse the source's floating timestamps; offsets are dropped in favour of the local wall clock.
pub fn parse_pickup_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    PICKUP_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|time| time.naive_local())
        })
}
