#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use taxi_core::query::TripQuery;
use taxi_core::record::RawTripRecord;
use taxi_core::test_helpers::raw_trip;
use taxi_fetch::{FetchConfig, FetchError, TripSource};
use tokio::sync::oneshot;

pub type SourceResult = Result<Vec<RawTripRecord>, FetchError>;

/// How a scripted response is delivered.
pub enum Scripted {
    Ready(SourceResult),
    Delayed(Duration, SourceResult),
    Gated(oneshot::Receiver<SourceResult>),
}

/// Source that answers each call with the first script whose key appears in the where clause.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<Vec<(String, Scripted)>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<TripQuery>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `script` for the next query whose where clause contains `key`.
    pub fn on(self, key: &str, script: Scripted) -> Self {
        self.scripts
            .lock()
            .expect("scripts lock")
            .push((key.to_string(), script));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<TripQuery> {
        self.queries.lock().expect("queries lock").clone()
    }

    fn take_script(&self, query: &TripQuery) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().expect("scripts lock");
        let idx = scripts
            .iter()
            .position(|(key, _)| query.where_clause.contains(key.as_str()))?;
        Some(scripts.remove(idx).1)
    }
}

#[async_trait]
impl TripSource for ScriptedSource {
    async fn fetch(&self, query: &TripQuery) -> SourceResult {
        self.queries.lock().expect("queries lock").push(query.clone());
        let script = self.take_script(query);
        self.calls.fetch_add(1, Ordering::SeqCst);

        match script {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Delayed(delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            Some(Scripted::Gated(gate)) => gate
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
            None => Ok(Vec::new()),
        }
    }
}

/// `count` valid raw trips with fares 10, 11, 12, ... picked up at 09:30.
pub fn raw_trips(count: usize) -> Vec<RawTripRecord> {
    (0..count)
        .map(|idx| {
            raw_trip(
                10.0 + idx as f64,
                1.0 + (idx % 20) as f64,
                "2014-01-15T09:30:00.000",
                if idx % 2 == 0 { "CSH" } else { "CRD" },
            )
        })
        .collect()
}

pub fn seeded_config() -> FetchConfig {
    FetchConfig {
        sample_seed: Some(42),
        ..FetchConfig::default()
    }
}

/// Spin on the scheduler until `source` has received `count` calls.
pub async fn wait_for_calls(source: &ScriptedSource, count: usize) {
    while source.calls() < count {
        tokio::task::yield_now().await;
    }
}
