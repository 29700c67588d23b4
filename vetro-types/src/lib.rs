//! Vetro-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod layout;
mod resolution;
mod wire;

pub use config::VetroConfig;
pub use error::VetroError;
pub use layout::BulkLayout;
pub use resolution::Resolution;
pub use wire::{BulkEntry, BulkResponse, Payload, SeriesIdentity, SeriesRecord, render_tag};
