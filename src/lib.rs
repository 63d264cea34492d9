//! Gap-filled time-series sum aggregation over timestamped records.
//!
//! Given a stream of `(timestamp, value)` records, a time range, and a
//! granularity (hour, day, week, month), [`rollup::aggregate`] produces two
//! index-aligned sequences — bucket labels and summed values — with no
//! missing buckets: ranges without data show up as zeros, never as gaps.
//!
//! # Module structure
//!
//! - [`rollup`] — the core engine: granularity table, range normalization,
//!   bucket enumeration, grouping with gap-fill, result assembly
//! - [`source`] — the record-source seam and the shipped implementations
//! - [`request`] — front-end request validation and response shaping
//! - [`cli`] — the `gapfill` binary's argument surface and runner

pub mod cli;
pub mod request;
pub mod rollup;
pub mod source;

pub use request::{AggregateRequest, AggregateResponse};
pub use rollup::{AggregateError, AggregateResult, Granularity, Query, Record, Series};
pub use source::{JsonFileSource, MemorySource, RecordSource};
