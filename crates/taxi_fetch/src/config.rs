//! Fetch configuration: defaults plus `TAXI_QUERY_*` environment overrides.

use std::time::Duration;

use taxi_core::query::MAX_QUERY_ROWS;
use taxi_core::sample::DISPLAY_CAP;

use crate::error::ConfigError;

/// NYC Open Data 2014 yellow taxi trips (Socrata resource).
pub const DEFAULT_ENDPOINT: &str = "https://data.cityofnewyork.us/resource/gkne-dk5s.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENDPOINT_VAR: &str = "TAXI_QUERY_ENDPOINT";
pub const TIMEOUT_VAR: &str = "TAXI_QUERY_TIMEOUT_SECS";
pub const DISPLAY_CAP_VAR: &str = "TAXI_QUERY_DISPLAY_CAP";
pub const ROW_LIMIT_VAR: &str = "TAXI_QUERY_ROW_LIMIT";
pub const SEED_VAR: &str = "TAXI_QUERY_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub display_cap: usize,
    pub row_limit: usize,
    /// Fixed sampling seed; `None` seeds from entropy.
    pub sample_seed: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            display_cap: DISPLAY_CAP,
            row_limit: MAX_QUERY_ROWS,
            sample_seed: None,
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            let endpoint = endpoint.trim();
            if endpoint.is_empty() {
                return Err(ConfigError::Empty { var: ENDPOINT_VAR });
            }
            config.endpoint = endpoint.to_string();
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(parse_positive(TIMEOUT_VAR, &value)?);
        }
        if let Some(value) = lookup(DISPLAY_CAP_VAR) {
            config.display_cap = parse_positive(DISPLAY_CAP_VAR, &value)? as usize;
        }
        if let Some(value) = lookup(ROW_LIMIT_VAR) {
            config.row_limit = parse_positive(ROW_LIMIT_VAR, &value)? as usize;
        }
        if let Some(value) = lookup(SEED_VAR) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: SEED_VAR,
                    value: value.clone(),
                })?;
            config.sample_seed = Some(seed);
        }

        Ok(config)
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
