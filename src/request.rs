//! The front-end contract: inbound request validation and outbound response
//! shaping.
//!
//! A front end (chat bot, HTTP handler, CLI) deserializes the raw request
//! into [`AggregateRequest`], converts it to a validated [`Query`], and on
//! success serializes the engine's series as [`AggregateResponse`].
//! Malformed or invalid requests are reported back to the requester as a
//! structured error ([`error_body`]) and never reach the engine.

use serde::{Deserialize, Serialize};

use crate::rollup::{AggregateError, AggregateResult, Query, Series};
use chrono::NaiveDateTime;

/// Inbound request shape: `{from, to, group_type}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub group_type: String,
}

impl AggregateRequest {
    /// Validate into a [`Query`]: the granularity tag must be one of the
    /// closed set and the range must not be inverted.
    pub fn into_query(self) -> AggregateResult<Query> {
        let granularity = self.group_type.parse()?;
        Query::new(self.from, self.to, granularity)
    }
}

/// Outbound response shape: two array-valued fields, index-aligned.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub dataset: Vec<f64>,
    pub labels: Vec<String>,
}

impl From<Series> for AggregateResponse {
    fn from(series: Series) -> Self {
        Self {
            dataset: series.dataset,
            labels: series.labels,
        }
    }
}

/// Render an error as the JSON object the front end sends back to the
/// requester.
pub fn error_body(err: &AggregateError) -> serde_json::Value {
    let kind = match err {
        AggregateError::UnsupportedGranularity(_) => "unsupported_granularity",
        AggregateError::InvalidRange { .. } => "invalid_range",
        AggregateError::Source(_) => "source",
    };
    serde_json::json!({
        "error": {
            "kind": kind,
            "message": err.to_string(),
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
