//! vetro-core
//!
//! Core traits and algorithms shared across the vetro ecosystem.
//!
//! - `source`: the `PageSource` collaborator trait the paginator consumes.
//! - `decode`: boundary decoding of raw page payloads into typed bulk shapes.
//! - `timeseries`: windowed pagination and cross-page stitching.
//! - `table`: the rectangular `Table` output type.
//! - `reshape`: single-series and bulk reshaping into tables.
//! - `timestamp`: flexible date resolution to Unix timestamps.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem as the async runtime. The paginator
//! issues one page request at a time and awaits it before computing the next
//! window, so there is never more than one request in flight per call.
//!
#![warn(missing_docs)]

/// Boundary decoding of raw payloads into typed bulk responses.
pub mod decode;
/// Single-series and bulk reshaping into rectangular tables.
pub mod reshape;
/// The `PageSource` collaborator trait.
pub mod source;
/// The rectangular table output type.
pub mod table;
/// Windowed pagination and cross-page stitching.
pub mod timeseries;
/// Flexible date resolution to Unix timestamps.
pub mod timestamp;

pub use decode::bulk_from_payload;
pub use reshape::bulk::{BulkTable, bulk_to_table};
pub use reshape::single::single_series_to_table;
pub use source::{PageSource, QueryParams};
pub use table::Table;
pub use timeseries::merge::{merge_entries, merge_records};
pub use timeseries::paginate::fetch_range;
pub use timestamp::{TimeValue, since_for_limit};
