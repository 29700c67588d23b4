use std::time::Duration;

use vetro_types::{VetroConfig, VetroError};

use crate::http::HttpSource;

/// Client for a bulk time-series analytics API.
///
/// All request-shaped state (key, base URL, timeout) lives in the underlying
/// [`HttpSource`]; the client itself holds no mutable state and individual
/// fetches own their accumulators exclusively.
pub struct Vetro {
    pub(crate) source: HttpSource,
}

impl Vetro {
    /// Returns a builder seeded with the default base URL and timeout.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> VetroBuilder {
        VetroBuilder::new(api_key)
    }

    /// Build a client with the default configuration for `api_key`.
    ///
    /// # Errors
    /// Returns [`VetroError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, VetroError> {
        Self::builder(api_key).build()
    }

    /// The underlying page source, for callers driving `vetro_core` directly.
    #[must_use]
    pub const fn source(&self) -> &HttpSource {
        &self.source
    }
}

/// Builder for a [`Vetro`] client.
pub struct VetroBuilder {
    config: VetroConfig,
}

impl VetroBuilder {
    /// Start from the default base URL and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: VetroConfig::new(api_key),
        }
    }

    /// Override the API base URL (no trailing slash required).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the per-request deadline delegated to the transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Construct the client.
    ///
    /// # Errors
    /// Returns [`VetroError::Config`] for an unparseable base URL and
    /// [`VetroError::Transport`] when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Vetro, VetroError> {
        Ok(Vetro {
            source: HttpSource::new(&self.config)?,
        })
    }
}
