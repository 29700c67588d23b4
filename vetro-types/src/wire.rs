use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page body as returned by the transport, decoded once at the boundary.
///
/// Bulk and metadata endpoints speak JSON; single-metric endpoints may return
/// delimited text instead when asked for it. Downstream code branches on the
/// variant explicitly rather than re-probing the body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A JSON document.
    Json(Value),
    /// Literal delimited text with a header row.
    Text(String),
}

impl Payload {
    /// The JSON document, if this payload is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// The raw text, if this payload is delimited text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(t) => Some(t),
        }
    }
}

/// One observation of one series at one instant.
///
/// A series is identified by its tag set: the privileged `a` (asset) tag,
/// which may be absent, plus zero or more secondary dimensions carried in
/// `tags`. Exactly one numeric-or-null value rides along as `v`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// The asset symbol (`a` tag), when present.
    #[serde(rename = "a", skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// The observed value (`v`), null when the series has no value here.
    #[serde(rename = "v")]
    pub value: Option<f64>,
    /// All remaining identifying tags, verbatim from the wire.
    #[serde(flatten)]
    pub tags: BTreeMap<String, Value>,
}

impl SeriesRecord {
    /// Derive the series-key string: non-asset tags sorted by name, each
    /// rendered `tag_value` and joined with `_`. With no tags left the key
    /// falls back to the asset symbol, then to the literal `value`.
    #[must_use]
    pub fn series_key(&self) -> String {
        let parts: Vec<String> = self
            .tags
            .iter()
            .map(|(k, v)| format!("{k}_{}", render_tag(v)))
            .collect();
        if parts.is_empty() {
            self.asset.clone().unwrap_or_else(|| "value".to_string())
        } else {
            parts.join("_")
        }
    }

    /// The record's identity: everything except the value. Two records with
    /// equal identities describe the same series at a given instant.
    #[must_use]
    pub fn identity(&self) -> SeriesIdentity {
        SeriesIdentity {
            asset: self.asset.clone(),
            tags: self
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), render_tag(v)))
                .collect(),
        }
    }
}

/// Identity of a series within one timestamp group: the asset tag plus the
/// rendered non-value tags. Used as the stitching merge key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesIdentity {
    /// The asset symbol, when present.
    pub asset: Option<String>,
    /// Rendered (name, value) pairs of the remaining tags, sorted by name.
    pub tags: Vec<(String, String)>,
}

/// Render a tag value the way it appears in derived keys: strings verbatim,
/// everything else through its JSON rendering.
#[must_use]
pub fn render_tag(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// All series observations at one instant (the "bulk" group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkEntry {
    /// Unix-epoch timestamp in seconds.
    pub t: i64,
    /// One record per series observed at `t`.
    #[serde(default)]
    pub bulk: Vec<SeriesRecord>,
}

/// A bulk page payload, or the combined result of paginating one: an ordered
/// sequence of timestamp groups plus whatever non-`data` metadata the first
/// non-empty page carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Non-data metadata keys, copied verbatim from the first non-empty page.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
    /// Timestamp groups in chronological order.
    #[serde(default)]
    pub data: Vec<BulkEntry>,
}

impl BulkResponse {
    /// True when the response carries no timestamp groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(asset: Option<&str>, tags: &[(&str, Value)]) -> SeriesRecord {
        SeriesRecord {
            asset: asset.map(str::to_string),
            value: Some(1.0),
            tags: tags
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn series_key_sorts_and_joins_tags() {
        let r = record(
            Some("BTC"),
            &[
                ("exchange", json!("binance")),
                ("currency", json!("USD")),
            ],
        );
        assert_eq!(r.series_key(), "currency_USD_exchange_binance");
    }

    #[test]
    fn series_key_falls_back_to_asset_then_value() {
        assert_eq!(record(Some("BTC"), &[]).series_key(), "BTC");
        assert_eq!(record(None, &[]).series_key(), "value");
    }

    #[test]
    fn series_key_renders_non_string_tags() {
        let r = record(None, &[("window", json!(7))]);
        assert_eq!(r.series_key(), "window_7");
    }

    #[test]
    fn identity_ignores_value() {
        let mut a = record(Some("BTC"), &[("c", json!("USD"))]);
        let mut b = a.clone();
        a.value = Some(1.0);
        b.value = Some(2.0);
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn wire_round_trip_preserves_extra_tags() {
        let raw = json!({"t": 100, "bulk": [{"a": "BTC", "c": "USD", "v": 1.5}]});
        let entry: BulkEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.bulk[0].asset.as_deref(), Some("BTC"));
        assert_eq!(entry.bulk[0].tags.get("c"), Some(&json!("USD")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }
}
