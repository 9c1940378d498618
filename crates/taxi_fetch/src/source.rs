//! Remote trip sources.
//!
//! [`TripSource`] is the seam the orchestrator calls through; [`HttpTripSource`]
//! talks to a Socrata-style JSON endpoint with reqwest.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use taxi_core::query::TripQuery;
use taxi_core::record::RawTripRecord;

use crate::error::FetchError;

#[async_trait]
pub trait TripSource: Send + Sync {
    /// Issue one query and return its raw records. Timeouts are applied by the caller.
    async fn fetch(&self, query: &TripQuery) -> Result<Vec<RawTripRecord>, FetchError>;
}

/// HTTP GET client for the trip endpoint.
#[derive(Debug, Clone)]
pub struct HttpTripSource {
    client: Client,
    endpoint: String,
}

impl HttpTripSource {
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|err| FetchError::Request(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_url(&self, query: &TripQuery) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|err| FetchError::Request(format!("invalid endpoint URL: {err}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl TripSource for HttpTripSource {
    async fn fetch(&self, query: &TripQuery) -> Result<Vec<RawTripRecord>, FetchError> {
        let url = self.request_url(query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::from_reqwest)?;
        Ok(decode_records(&body))
    }
}

/// Decode a response body into raw records.
///
/// Anything other than a JSON array counts as zero records. Array elements that
/// are not objects become empty records so they are counted and then dropped
/// by normalization.
pub fn decode_records(body: &[u8]) -> Vec<RawTripRecord> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(fields) => RawTripRecord::from(fields),
                _ => RawTripRecord::default(),
            })
            .collect(),
        Ok(_) => {
            tracing::warn!("trip endpoint returned a non-array body");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "trip endpoint returned undecodable JSON");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxi_core::FilterState;

    #[test]
    fn request_url_encodes_query_parameters() {
        let source = HttpTripSource::new("https://example.test/resource/trips.json/").unwrap();
        assert_eq!(source.endpoint(), "https://example.test/resource/trips.json");

        let query = TripQuery::from_filters(&FilterState::default());
        let url = source.request_url(&query).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("$where".to_string(), query.where_clause.clone()));
        assert_eq!(pairs[1], ("$limit".to_string(), "2000".to_string()));
        assert_eq!(pairs[2], ("$order".to_string(), "pickup_datetime ASC".to_string()));
    }

    #[test]
    fn request_url_rejects_bad_endpoint() {
        let source = HttpTripSource::new("not a url").unwrap();
        let query = TripQuery::from_filters(&FilterState::default());
        assert!(matches!(source.request_url(&query), Err(FetchError::Request(_))));
    }

    #[test]
    fn decode_records_handles_loose_bodies() {
        let records = decode_records(br#"[{"fare_amount": "7.5"}, 3, {"trip_distance": 1}]"#);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].number("fare_amount"), Some(7.5));
        assert_eq!(records[1], RawTripRecord::default());

        assert!(decode_records(br#"{"error": true}"#).is_empty());
        assert!(decode_records(b"<html>").is_empty());
        assert!(decode_records(b"[]").is_empty());
    }
}
