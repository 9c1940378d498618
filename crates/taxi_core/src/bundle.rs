//! The immutable result of one successful fetch.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    summarize, TripSummary, DISTANCE_BIN_COUNT, FARE_BUCKET_COUNT, PAYMENT_BIN_COUNT,
};
use crate::normalize::NormalizedSet;
use crate::record::NormalizedTrip;
use crate::sample::sample_trips;

/// Everything the map and chart renderers need for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub sampled_trips: Vec<NormalizedTrip>,
    pub fare_by_time_bucket: [f64; FARE_BUCKET_COUNT],
    pub distance_histogram: [u64; DISTANCE_BIN_COUNT],
    pub payment_histogram: [u64; PAYMENT_BIN_COUNT],
    pub total_valid_count: usize,
    pub sampled_count: usize,
    /// Raw records received minus `total_valid_count`.
    pub dropped_count: usize,
}

impl ResultBundle {
    /// Sample the normalized set for display and summarize the full population.
    pub fn assemble<R: Rng + ?Sized>(
        set: &NormalizedSet,
        display_cap: usize,
        rng: &mut R,
    ) -> Self {
        let summary = summarize(&set.trips);
        let sample = sample_trips(&set.trips, display_cap, rng);
        Self {
            sampled_count: sample.sampled_count(),
            total_valid_count: sample.total_count,
            sampled_trips: sample.trips,
            fare_by_time_bucket: summary.fare_by_time_bucket,
            distance_histogram: summary.distance_histogram,
            payment_histogram: summary.payment_histogram,
            dropped_count: set.dropped_count(),
        }
    }

    pub fn summary(&self) -> TripSummary {
        TripSummary {
            fare_by_time_bucket: self.fare_by_time_bucket,
            distance_histogram: self.distance_histogram,
            payment_histogram: self.payment_histogram,
        }
    }

    pub fn is_sampled(&self) -> bool {
        self.sampled_count < self.total_valid_count
    }

    /// Notice shown next to the map when only part of the result is drawn.
    pub fn sampling_note(&self) -> Option<String> {
        self.is_sampled().then(|| {
            format!(
                "Showing a random sample of {} trips out of {} total trips.",
                self.sampled_count, self.total_valid_count
            )
        })
    }
}
