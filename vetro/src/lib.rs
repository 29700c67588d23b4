//! Vetro fetches time-series metrics from a bulk analytics API and reshapes
//! them into tables.
//!
//! Overview
//! - `Vetro` wraps an HTTP session (API key, base URL, per-request timeout)
//!   behind the `vetro_core` `PageSource` contract.
//! - Single-metric fetches return the raw decoded payload or a one-column
//!   table named after the metric path.
//! - Bulk fetches cover arbitrary time ranges by walking bounded windows and
//!   stitching pages, then pivot into a wide table or per-asset /
//!   per-series-key sub-tables.
//! - Metadata endpoints and an optional on-disk asset→metrics cache round out
//!   the glue the data endpoints need.
//!
//! Key behaviors and trade-offs
//! - Pagination is sequential: one window in flight at a time, two consecutive
//!   empty pages end the walk, and a page failure returns what was already
//!   accumulated rather than erroring out.
//! - Nothing is retried anywhere; retry policy, if wanted, belongs in a
//!   wrapping `PageSource`.
//! - With `paginate` disabled, a requested range wider than the resolution's
//!   single-page cap is narrowed to the most recent window.
//!
//! Example
//! ```rust,ignore
//! use vetro::{BulkLayout, BulkRequest, Vetro};
//!
//! let client = Vetro::builder("my-api-key").build()?;
//! let req = BulkRequest::new("market/price_usd_close")
//!     .assets(["BTC", "ETH"])
//!     .since("2024-01-01")
//!     .paginate(true);
//! let tables = client.fetch_bulk_table(&req, BulkLayout::ByAsset).await?;
//! ```
#![warn(missing_docs)]

mod client;
mod fetch;
mod http;
mod metadata;
mod request;

pub use client::{Vetro, VetroBuilder};
pub use http::HttpSource;
pub use metadata::{AssetInfo, MetricMetadata, MetricParameters};
pub use request::{BulkRequest, MetricFormat, MetricRequest};

pub use vetro_core::{BulkTable, PageSource, QueryParams, Table, TimeValue};
pub use vetro_types::{
    BulkEntry, BulkLayout, BulkResponse, Payload, Resolution, SeriesRecord, VetroConfig,
    VetroError,
};
