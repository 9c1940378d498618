//! Trip fixtures shared by unit tests, integration tests and benchmarks.

use chrono::NaiveDate;
use serde_json::json;

use crate::record::{NormalizedTrip, RawTripRecord};

/// A normalized Midtown-to-downtown trip picked up at 09:00 on the default filter day.
pub fn sample_trip() -> NormalizedTrip {
    NormalizedTrip {
        pickup_latitude: 40.758,
        pickup_longitude: -73.9855,
        dropoff_latitude: 40.7128,
        dropoff_longitude: -74.006,
        fare_amount: 12.0,
        trip_distance: 3.0,
        pickup_datetime: NaiveDate::from_ymd_opt(2014, 1, 15)
            .and_then(|date| date.and_hms_opt(9, 0, 0)),
        payment_type: Some("CRD".to_string()),
    }
}

/// Trip picked up at `hour` (0-23) with the given fare.
pub fn trip_at(hour: u32, fare: f64) -> NormalizedTrip {
    NormalizedTrip {
        fare_amount: fare,
        pickup_datetime: NaiveDate::from_ymd_opt(2014, 1, 15)
            .and_then(|date| date.and_hms_opt(hour, 0, 0)),
        ..sample_trip()
    }
}

pub fn trip_with_fare(fare: f64) -> NormalizedTrip {
    NormalizedTrip {
        fare_amount: fare,
        ..sample_trip()
    }
}

pub fn trip_with_distance(distance: f64) -> NormalizedTrip {
    NormalizedTrip {
        trip_distance: distance,
        ..sample_trip()
    }
}

pub fn trip_with_payment(code: Option<&str>) -> NormalizedTrip {
    NormalizedTrip {
        payment_type: code.map(str::to_string),
        ..sample_trip()
    }
}

/// Raw record in the remote source's string-typed layout.
pub fn raw_trip(fare: f64, distance: f64, pickup: &str, payment: &str) -> RawTripRecord {
    serde_json::from_value(json!({
        "vendor_id": "CMT",
        "pickup_datetime": pickup,
        "dropoff_datetime": pickup,
        "pickup_latitude": "40.758",
        "pickup_longitude": "-73.9855",
        "dropoff_latitude": "40.7128",
        "dropoff_longitude": "-74.006",
        "fare_amount": fare.to_string(),
        "trip_distance": distance.to_string(),
        "payment_type": payment,
    }))
    .unwrap_or_default()
}

/// Raw record missing its fare, which normalization must drop.
pub fn raw_trip_without_fare() -> RawTripRecord {
    let mut record = raw_trip(0.0, 1.0, "2014-01-15T09:00:00.000", "CSH");
    record.0.remove("fare_amount");
    record
}
