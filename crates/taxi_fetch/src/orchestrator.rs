//! Request lifecycle for trip queries.
//!
//! The orchestrator moves between `Idle`, `Fetching`, `Success`, `Empty` and
//! `Failed`. Every call to [`FetchOrchestrator::begin`] bumps a generation
//! counter and cancels the previous ticket; a response is only published when
//! its ticket still carries the latest generation, so a slow stale request can
//! never overwrite a fresher result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use taxi_core::normalize::normalize_records;
use taxi_core::query::TripQuery;
use taxi_core::record::RawTripRecord;
use taxi_core::{FilterState, ResultBundle};
use tokio_util::sync::CancellationToken;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::source::TripSource;

/// Why a completed fetch produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoRecords,
    NoValidRecords { raw_count: usize },
}

impl EmptyReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            EmptyReason::NoRecords => {
                "No trips found for the selected filters. Try adjusting your search criteria \
                 or selecting a different time."
            }
            EmptyReason::NoValidRecords { .. } => "No valid trip data found in the response",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching {
        generation: u64,
    },
    Success(Arc<ResultBundle>),
    Empty(EmptyReason),
    Failed(FetchError),
}

impl FetchState {
    pub fn is_fetching(&self) -> bool {
        matches!(self, FetchState::Fetching { .. })
    }

    pub fn bundle(&self) -> Option<&Arc<ResultBundle>> {
        match self {
            FetchState::Success(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Banner text for the empty and failed states.
    pub fn user_message(&self) -> Option<String> {
        match self {
            FetchState::Empty(reason) => Some(reason.user_message().to_string()),
            FetchState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

/// Result of driving one ticket to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The ticket was current and its state is now published.
    Applied(FetchState),
    /// A newer ticket was issued before this one finished; nothing was published.
    Superseded,
}

/// Handle for one in-flight fetch. Cancelling it aborts the remote call.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    filters: FilterState,
    query: TripQuery,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn query(&self) -> &TripQuery {
        &self.query
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    state: FetchState,
    cancel: Option<CancellationToken>,
    last_filters: Option<FilterState>,
}

pub struct FetchOrchestrator<S, R = StdRng> {
    source: S,
    config: FetchConfig,
    rng: Mutex<R>,
    inner: Mutex<Inner>,
}

impl<S: TripSource> FetchOrchestrator<S, StdRng> {
    /// Orchestrator sampling with `config.sample_seed`, or entropy when unset.
    pub fn new(source: S, config: FetchConfig) -> Self {
        let rng = match config.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(source, config, rng)
    }
}

impl<S, R> FetchOrchestrator<S, R>
where
    S: TripSource,
    R: Rng + Send,
{
    pub fn with_rng(source: S, config: FetchConfig, rng: R) -> Self {
        Self {
            source,
            config,
            rng: Mutex::new(rng),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> FetchState {
        self.lock_inner().state.clone()
    }

    /// The published bundle, if the current state is `Success`.
    pub fn bundle(&self) -> Option<Arc<ResultBundle>> {
        self.lock_inner().state.bundle().cloned()
    }

    pub fn current_generation(&self) -> u64 {
        self.lock_inner().generation
    }

    pub fn last_filters(&self) -> Option<FilterState> {
        self.lock_inner().last_filters.clone()
    }

    /// Enter `Fetching` for `filters`, superseding any in-flight ticket.
    ///
    /// Clears the previous bundle or error and builds the remote query.
    pub fn begin(&self, filters: FilterState) -> FetchTicket {
        let query = TripQuery::from_filters(&filters).with_limit(self.config.row_limit);
        let cancel = CancellationToken::new();

        let mut inner = self.lock_inner();
        if let Some(previous) = inner.cancel.replace(cancel.clone()) {
            previous.cancel();
        }
        inner.generation += 1;
        inner.state = FetchState::Fetching {
            generation: inner.generation,
        };
        inner.last_filters = Some(filters.clone());

        tracing::info!(
            generation = inner.generation,
            where_clause = %query.where_clause,
            "trip fetch started"
        );

        FetchTicket {
            generation: inner.generation,
            filters,
            query,
            cancel,
        }
    }

    /// Run the remote call for `ticket` and publish its outcome if still current.
    pub async fn complete(&self, ticket: FetchTicket) -> Outcome {
        let timeout = self.config.timeout;
        let call = tokio::time::timeout(timeout, self.source.fetch(&ticket.query));

        let result = tokio::select! {
            biased;
            _ = ticket.cancel.cancelled() => None,
            result = call => Some(result),
        };

        let next = match result {
            None => {
                tracing::debug!(generation = ticket.generation, "trip fetch cancelled");
                FetchState::Failed(FetchError::Cancelled)
            }
            Some(Err(_elapsed)) => FetchState::Failed(FetchError::Timeout {
                secs: timeout.as_secs(),
            }),
            Some(Ok(Err(err))) => FetchState::Failed(err),
            Some(Ok(Ok(records))) => self.process(&records),
        };

        self.publish(ticket.generation, next)
    }

    /// `begin` followed by `complete`.
    pub async fn fetch(&self, filters: FilterState) -> Outcome {
        let ticket = self.begin(filters);
        self.complete(ticket).await
    }

    /// Re-run the most recent filters. `None` if nothing was fetched yet.
    pub async fn retry(&self) -> Option<Outcome> {
        let filters = self.last_filters()?;
        Some(self.fetch(filters).await)
    }

    fn process(&self, records: &[RawTripRecord]) -> FetchState {
        if records.is_empty() {
            return FetchState::Empty(EmptyReason::NoRecords);
        }

        let set = normalize_records(records);
        if set.is_empty() {
            return FetchState::Empty(EmptyReason::NoValidRecords {
                raw_count: set.raw_count,
            });
        }

        let bundle = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            ResultBundle::assemble(&set, self.config.display_cap, &mut *rng)
        };
        FetchState::Success(Arc::new(bundle))
    }

    fn publish(&self, generation: u64, next: FetchState) -> Outcome {
        let mut inner = self.lock_inner();
        if inner.generation != generation {
            tracing::debug!(
                generation,
                current = inner.generation,
                "discarding stale trip fetch result"
            );
            return Outcome::Superseded;
        }

        inner.cancel = None;
        match &next {
            FetchState::Success(bundle) => tracing::info!(
                generation,
                total = bundle.total_valid_count,
                sampled = bundle.sampled_count,
                dropped = bundle.dropped_count,
                "trip fetch succeeded"
            ),
            FetchState::Empty(reason) => {
                tracing::warn!(generation, ?reason, "trip fetch returned no usable trips")
            }
            FetchState::Failed(err) => {
                tracing::warn!(generation, error = %err, "trip fetch failed")
            }
            FetchState::Idle | FetchState::Fetching { .. } => {}
        }
        inner.state = next.clone();
        Outcome::Applied(next)
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use taxi_core::test_helpers::raw_trip;

    struct FixedSource(Vec<RawTripRecord>);

    #[async_trait]
    impl TripSource for FixedSource {
        async fn fetch(&self, _query: &TripQuery) -> Result<Vec<RawTripRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn orchestrator(records: Vec<RawTripRecord>) -> FetchOrchestrator<FixedSource> {
        let config = FetchConfig {
            sample_seed: Some(1),
            ..FetchConfig::default()
        };
        FetchOrchestrator::new(FixedSource(records), config)
    }

    #[test]
    fn begin_bumps_generation_and_cancels_previous_ticket() {
        let orchestrator = orchestrator(Vec::new());
        assert_eq!(orchestrator.state(), FetchState::Idle);

        let first = orchestrator.begin(FilterState::default());
        let second = orchestrator.begin(FilterState::default());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(second.generation(), first.generation() + 1);
        assert_eq!(orchestrator.state(), FetchState::Fetching { generation: 2 });
    }

    #[test]
    fn publish_ignores_stale_generation() {
        let orchestrator = orchestrator(Vec::new());
        let stale = orchestrator.begin(FilterState::default());
        let _current = orchestrator.begin(FilterState::default());

        let outcome = orchestrator.publish(
            stale.generation(),
            FetchState::Empty(EmptyReason::NoRecords),
        );
        assert_eq!(outcome, Outcome::Superseded);
        assert!(orchestrator.state().is_fetching());
    }

    #[test]
    fn ticket_query_respects_row_limit() {
        let config = FetchConfig {
            row_limit: 25,
            ..FetchConfig::default()
        };
        let orchestrator = FetchOrchestrator::new(FixedSource(Vec::new()), config);
        let ticket = orchestrator.begin(FilterState::default());
        assert_eq!(ticket.query().limit, 25);
        assert_eq!(ticket.filters(), &FilterState::default());
    }

    #[tokio::test]
    async fn process_distinguishes_empty_and_invalid_responses() {
        let empty = orchestrator(Vec::new());
        assert_eq!(
            empty.fetch(FilterState::default()).await,
            Outcome::Applied(FetchState::Empty(EmptyReason::NoRecords))
        );

        let invalid = orchestrator(vec![RawTripRecord::default(), RawTripRecord::default()]);
        assert_eq!(
            invalid.fetch(FilterState::default()).await,
            Outcome::Applied(FetchState::Empty(EmptyReason::NoValidRecords { raw_count: 2 }))
        );

        let valid = orchestrator(vec![raw_trip(9.0, 1.0, "2014-01-15T09:00:00.000", "CSH")]);
        let bundle = match valid.fetch(FilterState::default()).await {
            Outcome::Applied(FetchState::Success(bundle)) => bundle,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(bundle.total_valid_count, 1);
        assert_eq!(valid.bundle(), Some(bundle));
    }
}
