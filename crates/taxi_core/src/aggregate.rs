//! Summary statistics over the full normalized trip set.
//!
//! All three projections are pure functions of their input and are always
//! computed on the complete population, never on the display sample.

use serde::{Deserialize, Serialize};

use crate::filters::{CARD_CODE, CASH_CODE};
use crate::record::NormalizedTrip;

pub const FARE_BUCKET_COUNT: usize = 6;
pub const HOURS_PER_BUCKET: u32 = 4;
pub const DISTANCE_BIN_COUNT: usize = 5;
pub const PAYMENT_BIN_COUNT: usize = 3;

/// Inclusive upper bounds of the distance bins, in miles. The last bin is open.
pub const DISTANCE_BIN_UPPER_BOUNDS: [f64; DISTANCE_BIN_COUNT] =
    [2.0, 5.0, 10.0, 15.0, f64::INFINITY];

pub const FARE_BUCKET_LABELS: [&str; FARE_BUCKET_COUNT] =
    ["12am", "4am", "8am", "12pm", "4pm", "8pm"];
pub const DISTANCE_BIN_LABELS: [&str; DISTANCE_BIN_COUNT] = ["0-2", "2-5", "5-10", "10-15", "15+"];
pub const PAYMENT_LABELS: [&str; PAYMENT_BIN_COUNT] = ["Cash", "Card", "Other"];

/// Payment classification used by the payment histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentClass {
    Cash = 0,
    Card = 1,
    Other = 2,
}

impl PaymentClass {
    pub fn classify(code: Option<&str>) -> Self {
        match code {
            Some(code) if code.eq_ignore_ascii_case(CASH_CODE) => PaymentClass::Cash,
            Some(code) if code.eq_ignore_ascii_case(CARD_CODE) => PaymentClass::Card,
            _ => PaymentClass::Other,
        }
    }
}

/// The three chart projections of one result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub fare_by_time_bucket: [f64; FARE_BUCKET_COUNT],
    pub distance_histogram: [u64; DISTANCE_BIN_COUNT],
    pub payment_histogram: [u64; PAYMENT_BIN_COUNT],
}

impl TripSummary {
    /// All-zero projections, which renderers show as "no data".
    pub fn is_empty(&self) -> bool {
        self.fare_by_time_bucket.iter().all(|fare| *fare == 0.0)
            && self.distance_histogram.iter().all(|count| *count == 0)
            && self.payment_histogram.iter().all(|count| *count == 0)
    }
}

pub fn summarize(trips: &[NormalizedTrip]) -> TripSummary {
    TripSummary {
        fare_by_time_bucket: fare_by_time_bucket(trips),
        distance_histogram: distance_histogram(trips),
        payment_histogram: payment_histogram(trips),
    }
}

/// Bucket index for an hour of day: `floor(hour / 4)`.
pub fn time_bucket(hour: u32) -> Option<usize> {
    let bucket = (hour / HOURS_PER_BUCKET) as usize;
    (bucket < FARE_BUCKET_COUNT).then_some(bucket)
}

/// Mean fare per 4-hour bucket, rounded to cents. Empty buckets report 0.
/// Trips without a usable pickup timestamp are left out.
pub fn fare_by_time_bucket(trips: &[NormalizedTrip]) -> [f64; FARE_BUCKET_COUNT] {
    let mut totals = [0.0_f64; FARE_BUCKET_COUNT];
    let mut counts = [0_u64; FARE_BUCKET_COUNT];

    for trip in trips {
        if let Some(bucket) = trip.pickup_hour().and_then(time_bucket) {
            totals[bucket] += trip.fare_amount;
            counts[bucket] += 1;
        }
    }

    let mut means = [0.0_f64; FARE_BUCKET_COUNT];
    for (mean, (total, count)) in means.iter_mut().zip(totals.iter().zip(counts.iter())) {
        if *count > 0 {
            *mean = round_cents(total / *count as f64);
        }
    }
    means
}

/// First bin whose inclusive upper bound is at least `distance`.
pub fn distance_bin(distance: f64) -> usize {
    DISTANCE_BIN_UPPER_BOUNDS
        .iter()
        .position(|upper| distance <= *upper)
        .unwrap_or(DISTANCE_BIN_COUNT - 1)
}

pub fn distance_histogram(trips: &[NormalizedTrip]) -> [u64; DISTANCE_BIN_COUNT] {
    let mut bins = [0_u64; DISTANCE_BIN_COUNT];
    for trip in trips {
        bins[distance_bin(trip.trip_distance)] += 1;
    }
    bins
}

pub fn payment_histogram(trips: &[NormalizedTrip]) -> [u64; PAYMENT_BIN_COUNT] {
    let mut bins = [0_u64; PAYMENT_BIN_COUNT];
    for trip in trips {
        bins[PaymentClass::classify(trip.payment_type.as_deref()) as usize] += 1;
    }
    bins
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
