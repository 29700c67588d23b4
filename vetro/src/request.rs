use vetro_core::{QueryParams, TimeValue};
use vetro_types::Resolution;

/// Response body format for single-metric fetches. Bulk endpoints always
/// speak JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricFormat {
    /// JSON body (`f=json`).
    #[default]
    Json,
    /// Delimited text body with a header row (`f=csv`).
    Csv,
}

impl MetricFormat {
    /// The wire value of the `f` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Parameters of a single-metric fetch.
///
/// `limit` overrides `since`/`until`: the range is derived so the most recent
/// `limit` points ending now are returned.
#[derive(Debug, Clone)]
pub struct MetricRequest {
    pub(crate) path: String,
    pub(crate) asset: String,
    pub(crate) since: Option<TimeValue>,
    pub(crate) until: Option<TimeValue>,
    pub(crate) resolution: Resolution,
    pub(crate) currency: Option<String>,
    pub(crate) format: MetricFormat,
    pub(crate) limit: Option<u32>,
    pub(crate) extra: QueryParams,
}

impl MetricRequest {
    /// A request for `path` (e.g. `market/price_usd_close`) and one asset,
    /// at daily resolution, JSON format, over the server-default range.
    #[must_use]
    pub fn new(path: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            asset: asset.into(),
            since: None,
            until: None,
            resolution: Resolution::default(),
            currency: None,
            format: MetricFormat::default(),
            limit: None,
            extra: QueryParams::new(),
        }
    }

    /// The metric path this request targets.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Start of the requested range (epoch seconds, datetime, or date text).
    #[must_use]
    pub fn since(mut self, since: impl Into<TimeValue>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// End of the requested range.
    #[must_use]
    pub fn until(mut self, until: impl Into<TimeValue>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Sampling resolution (`i` parameter).
    #[must_use]
    pub const fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Currency for metrics that support it (`c` parameter).
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Response body format (`f` parameter).
    #[must_use]
    pub const fn format(mut self, format: MetricFormat) -> Self {
        self.format = format;
        self
    }

    /// Fetch exactly the most recent `limit` points, ending now. Overrides
    /// `since`/`until`.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attach an additional query parameter verbatim.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }
}

/// Parameters of a bulk fetch across one or more assets.
#[derive(Debug, Clone)]
pub struct BulkRequest {
    pub(crate) path: String,
    pub(crate) assets: Vec<String>,
    pub(crate) since: Option<TimeValue>,
    pub(crate) until: Option<TimeValue>,
    pub(crate) resolution: Resolution,
    pub(crate) currency: Option<String>,
    pub(crate) paginate: bool,
    pub(crate) limit: Option<u32>,
    pub(crate) extra: QueryParams,
}

impl BulkRequest {
    /// A request for `path` without the `/bulk` suffix, at daily resolution,
    /// in native currency, without pagination.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            assets: Vec::new(),
            since: None,
            until: None,
            resolution: Resolution::default(),
            currency: Some("native".to_string()),
            paginate: false,
            limit: None,
            extra: QueryParams::new(),
        }
    }

    /// The metric path this request targets (without `/bulk`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Asset symbols to fetch; each becomes one repeated `a` parameter.
    #[must_use]
    pub fn assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Start of the requested range. With pagination enabled the walk runs
    /// forward from here; without it, absent `since` means one most-recent
    /// window.
    #[must_use]
    pub fn since(mut self, since: impl Into<TimeValue>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// End of the requested range; defaults to now.
    #[must_use]
    pub fn until(mut self, until: impl Into<TimeValue>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Sampling resolution; also bounds the per-page window.
    #[must_use]
    pub const fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Currency for metrics that support it. Defaults to `native`.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Walk the whole range in bounded windows instead of issuing one page.
    #[must_use]
    pub const fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    /// Fetch exactly the most recent `limit` points, ending now. Overrides
    /// `since`/`until` and disables pagination.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attach an additional query parameter verbatim.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }
}
