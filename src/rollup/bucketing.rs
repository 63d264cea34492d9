//! Range normalization and bucket enumeration.
//!
//! Turns a raw `[from, to]` query range into the complete, ordered, zero-sum
//! bucket sequence the grouping step fills in.

use chrono::NaiveDateTime;

use super::types::{Bucket, Granularity, has_zero_minute_second};

/// Compute the effective upper bound for bucket enumeration.
///
/// When `to` has zero minute and second, the range is extended by one step so
/// the enumerator still emits the bucket sitting exactly on that boundary
/// instead of silently dropping the caller's last intended bucket.
///
/// The check looks at minute and second only, never the hour: for day, week,
/// and month granularity a `to` of e.g. `14:00:00` triggers the same
/// one-step extension even though it is not aligned to a day boundary. This
/// reproduces the upstream system's behavior verbatim and consumers depend
/// on it; do not tighten the condition here.
pub fn effective_upper_bound(to: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    if has_zero_minute_second(to) {
        // Overflow can only happen at the edge of the representable range;
        // leave the bound unextended rather than panic.
        granularity.advance(to).unwrap_or(to)
    } else {
        to
    }
}

/// Enumerate the complete bucket sequence covering `[from, effective_to]`.
///
/// Starts at `from` and advances one granularity step at a time, emitting a
/// zero-sum bucket per step, until the cursor passes `effective_to`. With
/// `from <= effective_to` this yields at least one bucket. Starts are
/// strictly ascending with no duplicates, and the label of each bucket is
/// its start rendered through the granularity's truncation pattern.
///
/// Week buckets start wherever `from` lands and step by seven days; they are
/// not snapped to a canonical week start.
pub fn enumerate(
    from: NaiveDateTime,
    effective_to: NaiveDateTime,
    granularity: Granularity,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut cursor = from;
    while cursor <= effective_to {
        buckets.push(Bucket {
            start: cursor,
            label: cursor.format(granularity.label_format()).to_string(),
            sum: 0.0,
        });
        match granularity.advance(cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
