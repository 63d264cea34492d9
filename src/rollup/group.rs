//! Record-to-bucket assignment and sum accumulation.

use chrono::NaiveDateTime;
use tracing::trace;

use super::types::{Bucket, Record};

/// Accumulate record values into the enumerated buckets.
///
/// Each record lands in the bucket with the greatest `start` at or before
/// its timestamp. Records before the first bucket start or at/after
/// `effective_to` are out of range and skipped without error: the record
/// source contract already constrains the range, and a complete gap-filled
/// series beats failing on noisy upstream data.
///
/// An empty record slice is the expected "no data" case and leaves every
/// bucket at its zero sum.
pub fn fill_sums(buckets: &mut [Bucket], records: &[Record], effective_to: NaiveDateTime) {
    if buckets.is_empty() {
        return;
    }
    let first_start = buckets[0].start;
    for record in records {
        if record.timestamp < first_start || record.timestamp >= effective_to {
            trace!(
                timestamp = %record.timestamp,
                value = record.value,
                "dropping out-of-range record"
            );
            continue;
        }
        // Last boundary at or before the timestamp. partition_point returns
        // the count of starts <= timestamp, which is >= 1 here.
        let idx = buckets.partition_point(|b| b.start <= record.timestamp) - 1;
        buckets[idx].sum += record.value;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollup::bucketing::enumerate;
    use crate::rollup::types::Granularity;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn day_buckets() -> (Vec<Bucket>, NaiveDateTime) {
        let effective_to = dt(2024, 1, 4, 0, 0, 0);
        let buckets = enumerate(dt(2024, 1, 1, 0, 0, 0), effective_to, Granularity::Day);
        (buckets, effective_to)
    }

    #[test]
    fn records_land_in_last_boundary_at_or_before() {
        let (mut buckets, effective_to) = day_buckets();
        let records = vec![
            Record::new(dt(2024, 1, 1, 5, 0, 0), 10.0),
            Record::new(dt(2024, 1, 1, 23, 0, 0), 5.0),
            Record::new(dt(2024, 1, 3, 1, 0, 0), 7.0),
        ];
        fill_sums(&mut buckets, &records, effective_to);
        let sums: Vec<_> = buckets.iter().map(|b| b.sum).collect();
        assert_eq!(sums, vec![15.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn record_exactly_on_boundary_goes_to_that_bucket() {
        let (mut buckets, effective_to) = day_buckets();
        let records = vec![Record::new(dt(2024, 1, 2, 0, 0, 0), 3.0)];
        fill_sums(&mut buckets, &records, effective_to);
        assert_eq!(buckets[1].sum, 3.0);
    }

    #[test]
    fn out_of_range_records_are_skipped() {
        let (mut buckets, effective_to) = day_buckets();
        let records = vec![
            Record::new(dt(2023, 12, 31, 23, 59, 59), 100.0), // before first start
            Record::new(dt(2024, 1, 4, 0, 0, 0), 100.0),      // at effective_to
            Record::new(dt(2024, 1, 9, 0, 0, 0), 100.0),      // after effective_to
        ];
        fill_sums(&mut buckets, &records, effective_to);
        assert!(buckets.iter().all(|b| b.sum == 0.0));
    }

    #[test]
    fn empty_records_leave_zero_sums() {
        let (mut buckets, effective_to) = day_buckets();
        fill_sums(&mut buckets, &[], effective_to);
        assert!(buckets.iter().all(|b| b.sum == 0.0));
    }

    #[test]
    fn unsorted_records_accumulate_the_same() {
        let (mut buckets, effective_to) = day_buckets();
        let records = vec![
            Record::new(dt(2024, 1, 3, 1, 0, 0), 7.0),
            Record::new(dt(2024, 1, 1, 23, 0, 0), 5.0),
            Record::new(dt(2024, 1, 1, 5, 0, 0), 10.0),
        ];
        fill_sums(&mut buckets, &records, effective_to);
        let sums: Vec<_> = buckets.iter().map(|b| b.sum).collect();
        assert_eq!(sums, vec![15.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn empty_bucket_slice_is_a_no_op() {
        let mut buckets: Vec<Bucket> = Vec::new();
        fill_sums(
            &mut buckets,
            &[Record::new(dt(2024, 1, 1, 0, 0, 0), 1.0)],
            dt(2024, 1, 2, 0, 0, 0),
        );
        assert!(buckets.is_empty());
    }
}
