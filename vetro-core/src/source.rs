use async_trait::async_trait;

use vetro_types::{Payload, VetroError};

/// Query parameters for one page request. Repeated names are allowed (the
/// upstream accepts e.g. several `a` parameters on bulk endpoints).
pub type QueryParams = Vec<(String, String)>;

/// Page-fetching abstraction the paginator and facade consume (and tests mock).
///
/// Implementations resolve `path` against their configured base URL, attach
/// `params`, and return the decoded-once body. Transport failures (network,
/// HTTP status) surface as [`VetroError::Transport`]; a body that is neither
/// valid JSON nor recognizable delimited text surfaces as
/// [`VetroError::Decode`]. Retry policy, if any, belongs behind this trait;
/// the core never retries.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page for `path` with the given query parameters.
    async fn get_page(&self, path: &str, params: &QueryParams) -> Result<Payload, VetroError>;
}
