//! Gap-filled time-series rollup engine.
//!
//! Answers "sum these timestamped values into hour/day/week/month buckets
//! between two instants, with no missing buckets" as one pure, synchronous
//! computation per call. The engine holds no state across calls and may be
//! invoked concurrently.
//!
//! # Module structure
//!
//! - [`types`] — granularity table, record/bucket/query/series types, errors
//! - [`bucketing`] — range normalization and bucket enumeration
//! - [`group`] — record-to-bucket assignment and sum accumulation

pub mod bucketing;
pub mod group;
pub mod types;

use tracing::debug;

pub use types::{
    AggregateError, AggregateResult, BoxError, Bucket, Granularity, Query, Record, Series,
};

use crate::source::RecordSource;

/// Run one aggregation: a complete, gap-filled series of sums for `query`.
///
/// Pipeline: normalize the upper bound, enumerate zero-sum buckets, fetch
/// records from the source, accumulate, assemble. The source is asked for
/// `[from, effective_to]` — the whole padded window — so that when `to`
/// lands exactly on a boundary, records belonging to the final enumerated
/// bucket still arrive. [`group::fill_sums`] stays the single range
/// authority and drops anything at or past `effective_to`.
pub fn aggregate<S>(query: &Query, source: &S) -> AggregateResult<Series>
where
    S: RecordSource + ?Sized,
{
    let effective_to = bucketing::effective_upper_bound(query.to, query.granularity);
    let mut buckets = bucketing::enumerate(query.from, effective_to, query.granularity);

    let records = source
        .fetch(query.from, effective_to)
        .map_err(AggregateError::Source)?;
    group::fill_sums(&mut buckets, &records, effective_to);

    debug!(
        from = %query.from,
        to = %query.to,
        effective_to = %effective_to,
        granularity = %query.granularity,
        buckets = buckets.len(),
        records = records.len(),
        "aggregated series"
    );

    Ok(Series::from_buckets(buckets))
}
