use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the vetro workspace.
///
/// This wraps transport failures, body decode failures, unrecognized payload
/// shapes, caller configuration mistakes, and cache-file I/O.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VetroError {
    /// Network or HTTP failure. Never retried by the core; pagination in
    /// progress returns what it has accumulated so far.
    #[error("transport failure{}: {msg}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status code, when the failure came from a response.
        status: Option<u16>,
        /// Human-readable failure message.
        msg: String,
    },

    /// Response body is neither valid JSON nor recognizable delimited text,
    /// or a typed decode of a page failed.
    #[error("decode failure: {0}")]
    Decode(String),

    /// Payload shape does not match any recognized schema. The message names
    /// the offending path or structure.
    #[error("unrecognized payload shape: {0}")]
    Format(String),

    /// Caller error: unknown resolution or layout, or an operation the target
    /// metric does not support. Raised before any request where feasible.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Cache file read/write failure.
    #[error("io failure: {0}")]
    Io(String),
}

impl VetroError {
    /// Helper: build a `Transport` error without a status code.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            msg: msg.into(),
        }
    }

    /// Helper: build a `Transport` error carrying an HTTP status code.
    pub fn transport_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Helper: build a `Format` error naming the offending structure.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Helper: build a `Config` error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for failures of the remote exchange itself (transport or
    /// decode), as opposed to caller-side mistakes.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode(_))
    }
}

impl From<std::io::Error> for VetroError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VetroError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
