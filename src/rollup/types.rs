//! Shared types for the rollup engine.
//!
//! These types are used by the core aggregation pipeline and by the request
//! layer, keeping granularity rules, bucket shapes, and the error taxonomy in
//! one place.

use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Boxed error from a record-source implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rollup-specific error.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The granularity tag is outside the closed hour/day/week/month set.
    #[error("unsupported granularity `{0}`; expected one of hour, day, week, month")]
    UnsupportedGranularity(String),

    /// The query range is inverted. Rejected up front rather than mapped to
    /// an empty series, so "no data" and "bad request" stay distinguishable.
    #[error("invalid range: `from` ({from}) is after `to` ({to})")]
    InvalidRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    /// The record source failed. This is a collaborator failure, not a flaw
    /// in the aggregation itself.
    #[error("record source failed: {0}")]
    Source(#[source] BoxError),
}

/// Convenience alias.
pub type AggregateResult<T> = std::result::Result<T, AggregateError>;

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// Time-bucket granularity. The set is closed: every variant carries exactly
/// one step rule ([`Granularity::advance`]) and one label format
/// ([`Granularity::label_format`]), and nothing can be registered at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

impl Granularity {
    /// The `chrono` format pattern used to render a bucket start as a label.
    ///
    /// Components below the granularity are zeroed textually (truncated, not
    /// rounded): hour labels zero minute/second, day and week labels zero the
    /// time of day, month labels additionally pin the day-of-month to `01`.
    pub fn label_format(self) -> &'static str {
        match self {
            Self::Hour => "%Y-%m-%dT%H:00:00",
            Self::Day | Self::Week => "%Y-%m-%dT00:00:00",
            Self::Month => "%Y-%m-01T00:00:00",
        }
    }

    /// Advance an instant by one step of this granularity.
    ///
    /// Hour/day/week are fixed durations. Month is calendar-relative — the
    /// 1st of one month steps to the 1st of the next, so spacing varies
    /// between 28 and 31 days. A fixed 30-day duration would drift.
    ///
    /// `None` only at the extreme edge of chrono's representable range.
    pub fn advance(self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Hour => start.checked_add_signed(Duration::hours(1)),
            Self::Day => start.checked_add_signed(Duration::days(1)),
            Self::Week => start.checked_add_signed(Duration::weeks(1)),
            Self::Month => start.checked_add_months(Months::new(1)),
        }
    }
}

impl FromStr for Granularity {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(AggregateError::UnsupportedGranularity(other.to_string())),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record and Bucket
// ---------------------------------------------------------------------------

/// A raw timestamped value as supplied by the record source.
///
/// The wire field is `dt`, matching the record documents of the upstream
/// system this engine serves.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "dt")]
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// One time bucket: a canonical start instant, its rendered label, and the
/// sum of matching record values.
///
/// Buckets are created zero-summed by the enumerator and only ever mutated by
/// the grouping step. Absence of data is `sum == 0.0`, never a missing
/// bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub start: NaiveDateTime,
    pub label: String,
    pub sum: f64,
}

// ---------------------------------------------------------------------------
// Query and Series
// ---------------------------------------------------------------------------

/// A validated aggregation query: an inclusive `[from, to]` range plus the
/// bucketing granularity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub granularity: Granularity,
}

impl Query {
    /// Build a query, rejecting inverted ranges.
    pub fn new(
        from: NaiveDateTime,
        to: NaiveDateTime,
        granularity: Granularity,
    ) -> AggregateResult<Self> {
        if from > to {
            return Err(AggregateError::InvalidRange { from, to });
        }
        Ok(Self {
            from,
            to,
            granularity,
        })
    }
}

/// The aggregation result: two index-aligned sequences, one entry per
/// bucket, ascending by bucket start.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub dataset: Vec<f64>,
}

impl Series {
    /// Assemble the output sequences from filled buckets, preserving the
    /// enumerator's ascending order. No re-sorting happens here.
    pub fn from_buckets(buckets: Vec<Bucket>) -> Self {
        let mut labels = Vec::with_capacity(buckets.len());
        let mut dataset = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            labels.push(bucket.label);
            dataset.push(bucket.sum);
        }
        Self { labels, dataset }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether an instant sits on a "round" boundary for range-padding purposes:
/// zero minute and zero second. The hour component is deliberately not
/// checked, for any granularity — see `bucketing::effective_upper_bound`.
pub(crate) fn has_zero_minute_second(at: NaiveDateTime) -> bool {
    at.minute() == 0 && at.second() == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
