use chrono::Utc;

use vetro_core::{
    BulkTable, PageSource, QueryParams, Table, TimeValue, bulk_from_payload, bulk_to_table,
    fetch_range, single_series_to_table, since_for_limit,
};
use vetro_types::{BulkLayout, BulkResponse, Payload, Resolution, VetroError};

use crate::Vetro;
use crate::request::{BulkRequest, MetricRequest};

impl Vetro {
    /// Fetch one metric for one asset and return the raw decoded payload.
    ///
    /// # Errors
    /// Transport/decode failures from the page request, format failures from
    /// unresolvable date values, and config failures from a zero `limit`.
    pub async fn fetch_metric(&self, req: &MetricRequest) -> Result<Payload, VetroError> {
        let mut params: QueryParams = vec![
            ("a".to_string(), req.asset.clone()),
            ("f".to_string(), req.format.as_str().to_string()),
            ("i".to_string(), req.resolution.as_str().to_string()),
        ];

        let (since, until) = req_range(req.limit, req.resolution, &req.since, &req.until)?;
        if let Some(s) = since {
            params.push(("s".to_string(), s.to_string()));
        }
        if let Some(u) = until {
            params.push(("u".to_string(), u.to_string()));
        }
        if let Some(currency) = &req.currency {
            params.push(("c".to_string(), currency.clone()));
        }
        params.extend(req.extra.iter().cloned());

        let path = format!("metrics/{}", req.path.trim_start_matches('/'));
        self.source.get_page(&path, &params).await
    }

    /// Fetch one metric and reshape it into a one-column (or, for nested and
    /// multi-column payloads, wider) table indexed by time.
    ///
    /// # Errors
    /// Everything [`Self::fetch_metric`] returns, plus format failures when
    /// the payload matches no recognized single-series schema.
    pub async fn fetch_metric_table(&self, req: &MetricRequest) -> Result<Table, VetroError> {
        let payload = self.fetch_metric(req).await?;
        single_series_to_table(&payload, &req.path)
    }

    /// Fetch a metric through its bulk endpoint, optionally paginating, and
    /// return the combined raw structure.
    ///
    /// The metric's metadata is consulted first; metrics that do not support
    /// bulk operations fail with a config error before any data request.
    ///
    /// # Errors
    /// Config failures from the bulk-support gate or a zero `limit`; format
    /// failures from unresolvable date values; transport/decode failures from
    /// the metadata request or a single non-paginated page. A page failure
    /// *during* pagination ends the walk and returns the accumulated data.
    pub async fn fetch_bulk_metric(&self, req: &BulkRequest) -> Result<BulkResponse, VetroError> {
        let metadata = self.metric_metadata(&req.path, None).await?;
        if !metadata.bulk_supported {
            return Err(VetroError::config(format!(
                "metric '{}' does not support bulk operations",
                req.path
            )));
        }

        let mut params: QueryParams = vec![(
            "i".to_string(),
            req.resolution.as_str().to_string(),
        )];
        for asset in &req.assets {
            params.push(("a".to_string(), asset.clone()));
        }
        if let Some(currency) = &req.currency {
            params.push(("c".to_string(), currency.clone()));
        }
        params.extend(req.extra.iter().cloned());

        // A limit pins the exact range, so there is nothing to paginate.
        let paginate = req.paginate && req.limit.is_none();
        let (since, until) = req_range(req.limit, req.resolution, &req.since, &req.until)?;
        let until = until.unwrap_or_else(|| Utc::now().timestamp());

        let path = format!("metrics/{}/bulk", req.path.trim_matches('/'));
        if paginate {
            return Ok(fetch_range(&self.source, &path, &params, since, until, req.resolution).await);
        }

        let window = req.resolution.max_window_secs();
        let since = match since {
            None => until - window,
            Some(s) if until - s > window => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    path = %req.path,
                    resolution = %req.resolution,
                    "requested timerange exceeds the single-page cap; narrowing 'since'"
                );
                until - window
            }
            Some(s) => s,
        };
        params.push(("s".to_string(), since.to_string()));
        params.push(("u".to_string(), until.to_string()));

        let payload = self.source.get_page(&path, &params).await?;
        bulk_from_payload(&payload)
    }

    /// Fetch a metric through its bulk endpoint and pivot it into `layout`.
    ///
    /// # Errors
    /// Everything [`Self::fetch_bulk_metric`] returns, plus format failures
    /// from the reshaping step.
    pub async fn fetch_bulk_table(
        &self,
        req: &BulkRequest,
        layout: BulkLayout,
    ) -> Result<BulkTable, VetroError> {
        let response = self.fetch_bulk_metric(req).await?;
        bulk_to_table(&response, layout)
    }
}

/// Resolve the effective `(since, until)` pair. A limit overrides both by
/// deriving a range that ends now and spans exactly `limit` steps.
fn req_range(
    limit: Option<u32>,
    resolution: Resolution,
    since: &Option<TimeValue>,
    until: &Option<TimeValue>,
) -> Result<(Option<i64>, Option<i64>), VetroError> {
    if let Some(limit) = limit {
        let now = Utc::now().timestamp();
        return Ok((Some(since_for_limit(resolution, limit, now)?), Some(now)));
    }
    let since = since.as_ref().map(TimeValue::resolve).transpose()?;
    let until = until.as_ref().map(TimeValue::resolve).transpose()?;
    Ok((since, until))
}
