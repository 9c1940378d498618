//! Display-size bounding of the normalized trip set.

use rand::seq::index;
use rand::Rng;

use crate::record::NormalizedTrip;

/// Maximum number of trips handed to the map renderer.
pub const DISPLAY_CAP: usize = 500;

/// Trips selected for display together with the size of the population they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSample {
    pub trips: Vec<NormalizedTrip>,
    pub total_count: usize,
}

impl TripSample {
    pub fn sampled_count(&self) -> usize {
        self.trips.len()
    }

    /// True when the display set is a strict subset of the population.
    pub fn is_truncated(&self) -> bool {
        self.trips.len() < self.total_count
    }
}

/// Return `trips` unchanged when it fits under `cap`; otherwise a uniformly random
/// subset of exactly `cap` distinct trips in no particular order.
pub fn sample_trips<R: Rng + ?Sized>(
    trips: &[NormalizedTrip],
    cap: usize,
    rng: &mut R,
) -> TripSample {
    let selected = if trips.len() <= cap {
        trips.to_vec()
    } else {
        index::sample(rng, trips.len(), cap)
            .into_iter()
            .map(|idx| trips[idx].clone())
            .collect()
    };

    TripSample {
        trips: selected,
        total_count: trips.len(),
    }
}

/// Indices chosen by [`sample_trips`] for the same generator state; useful to check membership.
pub fn sample_indices<R: Rng + ?Sized>(len: usize, cap: usize, rng: &mut R) -> Vec<usize> {
    if len <= cap {
        (0..len).collect()
    } else {
        index::sample(rng, len, cap).into_vec()
    }
}
