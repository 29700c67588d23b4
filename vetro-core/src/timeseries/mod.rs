//! Time-series retrieval utilities.
//!
//! Modules include:
//! - `merge`: stitch timestamp groups from successive pages into one ordered result
//! - `paginate`: walk a requested time range in bounded windows

/// Stitching of timestamp groups across page boundaries.
pub mod merge;
/// Windowed pagination over a page source.
pub mod paginate;
