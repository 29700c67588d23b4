//! Reshaping of raw payloads into rectangular tables.
//!
//! Single-series payloads become one table directly. Bulk payloads are
//! flattened once into long-form records, then pivoted into the layout the
//! caller asked for.

/// Bulk flatten-then-pivot reshaping.
pub mod bulk;
/// Single-series reshaping (JSON and delimited text).
pub mod single;
