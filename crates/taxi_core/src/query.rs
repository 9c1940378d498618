//! Encodes a [`FilterState`] into the remote filter expression.

use serde::Serialize;

use crate::filters::FilterState;
use crate::time_window::TimeWindow;

/// Maximum number of raw rows requested per fetch.
pub const MAX_QUERY_ROWS: usize = 2000;

/// Ordering clause; ascending pickup time keeps ties and sampling input stable.
pub const QUERY_ORDER: &str = "pickup_datetime ASC";

pub const WHERE_PARAM: &str = "$where";
pub const LIMIT_PARAM: &str = "$limit";
pub const ORDER_PARAM: &str = "$order";

/// A fully encoded remote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripQuery {
    pub where_clause: String,
    pub limit: usize,
    pub order: String,
}

impl TripQuery {
    pub fn from_filters(filters: &FilterState) -> Self {
        let window = TimeWindow::around(filters.time);
        Self {
            where_clause: encode_where_clause(filters, &window),
            limit: MAX_QUERY_ROWS,
            order: QUERY_ORDER.to_string(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Query string parameters in the order they are sent.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            (WHERE_PARAM, self.where_clause.clone()),
            (LIMIT_PARAM, self.limit.to_string()),
            (ORDER_PARAM, self.order.clone()),
        ]
    }
}

/// AND-joined predicate over pickup time, fare, distance and (optionally) payment.
///
/// Bounds come from clamped UI controls and are interpolated as plain literals.
/// With [`PaymentFilter::All`](crate::filters::PaymentFilter::All) the payment
/// clause is omitted entirely.
pub fn encode_where_clause(filters: &FilterState, window: &TimeWindow) -> String {
    let mut clauses = vec![
        format!("pickup_datetime >= '{}'", window.start_literal()),
        format!("pickup_datetime <= '{}'", window.end_literal()),
        format!("fare_amount >= {}", filters.fare.min),
        format!("fare_amount <= {}", filters.fare.max),
        format!("trip_distance >= {}", filters.distance.min),
        format!("trip_distance <= {}", filters.distance.max),
    ];
    if let Some(code) = filters.payment.code() {
        clauses.push(format!("payment_type = '{}'", code));
    }
    clauses.join(" AND ")
}
