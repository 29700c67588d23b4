use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vetro_core::{PageSource, QueryParams};
use vetro_types::{Payload, VetroError};

use crate::Vetro;

/// One supported asset, as listed by the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Asset identifier (e.g. `BTC`).
    #[serde(default)]
    pub id: String,
    /// Human-readable name, when the API provides one.
    #[serde(default)]
    pub name: Option<String>,
    /// Remaining metadata fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-parameter value lists a metric accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricParameters {
    /// Assets the metric is available for (`a`).
    #[serde(rename = "a", default)]
    pub assets: Vec<String>,
    /// Remaining parameter lists, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata for one metric path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricMetadata {
    /// Whether the metric's bulk endpoint may be used.
    #[serde(default)]
    pub bulk_supported: bool,
    /// Accepted parameter values.
    #[serde(default)]
    pub parameters: MetricParameters,
    /// Remaining metadata fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The on-disk asset→metric-paths mapping.
type AssetMetricsMap = BTreeMap<String, Vec<String>>;

impl Vetro {
    /// List all supported assets.
    ///
    /// # Errors
    /// Transport failures from the request, decode failures when the body is
    /// not the expected JSON list.
    pub async fn assets(&self) -> Result<Vec<AssetInfo>, VetroError> {
        let payload = self
            .source
            .get_page("metadata/assets", &QueryParams::new())
            .await?;
        from_json_payload(&payload)
    }

    /// List all available metric paths.
    ///
    /// # Errors
    /// Transport failures from the request, decode failures when the body is
    /// not the expected JSON list.
    pub async fn metrics(&self) -> Result<Vec<String>, VetroError> {
        let payload = self
            .source
            .get_page("metadata/metrics", &QueryParams::new())
            .await?;
        from_json_payload(&payload)
    }

    /// Fetch metadata for one metric path, optionally scoped to an asset.
    ///
    /// # Errors
    /// Transport failures from the request (including an error status for an
    /// invalid path), decode failures when the body is not a metadata object.
    pub async fn metric_metadata(
        &self,
        path: &str,
        asset: Option<&str>,
    ) -> Result<MetricMetadata, VetroError> {
        let mut params: QueryParams = vec![("path".to_string(), path.to_string())];
        if let Some(asset) = asset {
            params.push(("a".to_string(), asset.to_string()));
        }
        let payload = self.source.get_page("metadata/metric", &params).await?;
        from_json_payload(&payload)
    }

    /// Metric paths available for `asset`.
    ///
    /// Building the full asset→metrics map walks every metric's metadata, so
    /// passing a cache file is strongly advised: an existing readable cache is
    /// used as-is, and a freshly built map is persisted there. An unreadable
    /// or missing cache file falls back to a rebuild.
    ///
    /// # Errors
    /// Transport/decode failures from the metric listing (individual metric
    /// metadata failures are skipped), I/O failures when persisting the cache.
    pub async fn asset_metrics(
        &self,
        asset: &str,
        cache_file: Option<&Path>,
    ) -> Result<Vec<String>, VetroError> {
        let cached = cache_file.and_then(load_cached_map);
        let map = match cached {
            Some(map) => map,
            None => {
                let map = self.build_asset_metrics_map().await?;
                if let Some(path) = cache_file {
                    save_cached_map(path, &map)?;
                }
                map
            }
        };
        Ok(map.get(asset).cloned().unwrap_or_default())
    }

    /// Walk all metrics' metadata and invert it into asset → metric paths.
    async fn build_asset_metrics_map(&self) -> Result<AssetMetricsMap, VetroError> {
        let all_metrics = self.metrics().await?;
        #[cfg(feature = "tracing")]
        tracing::info!(
            metrics = all_metrics.len(),
            "building asset-to-metrics mapping from the API"
        );

        let mut map = AssetMetricsMap::new();
        for (i, metric_path) in all_metrics.iter().enumerate() {
            match self.metric_metadata(metric_path, None).await {
                Ok(metadata) => {
                    for symbol in metadata.parameters.assets {
                        let paths = map.entry(symbol).or_default();
                        if !paths.contains(metric_path) {
                            paths.push(metric_path.clone());
                        }
                    }
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        metric = %metric_path,
                        error = %_err,
                        "skipping metric while building the asset map"
                    );
                }
            }
            log_progress(i + 1, all_metrics.len());
        }

        #[cfg(feature = "tracing")]
        tracing::info!(assets = map.len(), "finished building asset-to-metrics mapping");
        Ok(map)
    }
}

#[allow(unused_variables)]
fn log_progress(processed: usize, total: usize) {
    #[cfg(feature = "tracing")]
    if processed % 50 == 0 || processed == total {
        tracing::debug!(processed, total, "asset-map progress");
    }
}

/// Decode a JSON payload into `T`; text payloads are a decode error here.
fn from_json_payload<T: serde::de::DeserializeOwned>(payload: &Payload) -> Result<T, VetroError> {
    match payload {
        Payload::Json(value) => Ok(serde_json::from_value(value.clone())?),
        Payload::Text(_) => Err(VetroError::decode(
            "expected a JSON body, got delimited text",
        )),
    }
}

fn load_cached_map(path: &Path) -> Option<AssetMetricsMap> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(map) => Some(map),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(file = %path.display(), error = %_err, "ignoring unreadable asset-metrics cache");
            None
        }
    }
}

fn save_cached_map(path: &Path, map: &AssetMetricsMap) -> Result<(), VetroError> {
    let body = serde_json::to_string_pretty(map)?;
    std::fs::write(path, body)?;
    Ok(())
}
