use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the upstream analytics API.
pub const DEFAULT_BASE_URL: &str = "https://api.glassnode.com/v1";

/// Default per-request deadline delegated to the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a `Vetro` client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetroConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Per-request deadline applied by the transport. There is no cancellation
    /// or timeout handling anywhere else in the core.
    pub timeout: Duration,
}

impl VetroConfig {
    /// Build a configuration with the default base URL and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
