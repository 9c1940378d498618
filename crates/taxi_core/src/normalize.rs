//! Validation of raw records into [`NormalizedTrip`]s.
//!
//! Records missing any required numeric field are dropped silently. This is
//! intentional data-quality filtering, so only the aggregate drop count is
//! reported (via [`NormalizedSet::dropped_count`] and a single debug log line).

use crate::record::{
    parse_pickup_datetime, NormalizedTrip, RawTripRecord, DROPOFF_LATITUDE, DROPOFF_LONGITUDE,
    FARE_AMOUNT, PAYMENT_TYPE, PICKUP_DATETIME, PICKUP_LATITUDE, PICKUP_LONGITUDE, TRIP_DISTANCE,
};

/// Trips that survived normalization, in source order, plus the raw input size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSet {
    pub trips: Vec<NormalizedTrip>,
    pub raw_count: usize,
}

impl NormalizedSet {
    pub fn valid_count(&self) -> usize {
        self.trips.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.raw_count.saturating_sub(self.trips.len())
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Normalize a single record, or `None` if a required numeric field is unusable.
pub fn normalize_record(raw: &RawTripRecord) -> Option<NormalizedTrip> {
    Some(NormalizedTrip {
        pickup_latitude: raw.number(PICKUP_LATITUDE)?,
        pickup_longitude: raw.number(PICKUP_LONGITUDE)?,
        dropoff_latitude: raw.number(DROPOFF_LATITUDE)?,
        dropoff_longitude: raw.number(DROPOFF_LONGITUDE)?,
        fare_amount: raw.number(FARE_AMOUNT)?,
        trip_distance: raw.number(TRIP_DISTANCE)?,
        pickup_datetime: raw.text(PICKUP_DATETIME).and_then(parse_pickup_datetime),
        payment_type: raw.text(PAYMENT_TYPE).map(str::to_string),
    })
}

pub fn normalize_records(records: &[RawTripRecord]) -> NormalizedSet {
    let trips: Vec<NormalizedTrip> = records.iter().filter_map(normalize_record).collect();
    let set = NormalizedSet {
        trips,
        raw_count: records.len(),
    };
    if set.dropped_count() > 0 {
        tracing::debug!(
            raw = set.raw_count,
            valid = set.valid_count(),
            dropped = set.dropped_count(),
            "dropped malformed trip records"
        );
    }
    set
}
