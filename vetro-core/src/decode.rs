//! Boundary decoding of raw bulk payloads.
//!
//! Bulk endpoints always speak JSON. The page body is decoded into the typed
//! [`BulkResponse`] shape exactly once, here; malformed individual records are
//! skipped with a warning rather than failing the page.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use vetro_types::{BulkEntry, BulkResponse, Payload, SeriesRecord, VetroError, render_tag};

/// Decode a raw page payload into a typed bulk response.
///
/// An absent (or null) `data` key yields an empty response; a present but
/// non-sequence `data` is a format error. Individually malformed timestamp
/// entries and series records are skipped with a warning.
///
/// # Errors
/// Returns [`VetroError::Format`] when the payload is not a JSON object with
/// a sequence-shaped `data` key.
pub fn bulk_from_payload(payload: &Payload) -> Result<BulkResponse, VetroError> {
    let root = match payload {
        Payload::Json(v) => v,
        Payload::Text(_) => {
            return Err(VetroError::format(
                "bulk payload is delimited text, expected a JSON object with a 'data' key",
            ));
        }
    };
    let obj = root.as_object().ok_or_else(|| {
        VetroError::format(format!("bulk payload is not a JSON object ({})", shape_of(root)))
    })?;

    let extra: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| k.as_str() != "data")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let mut data = Vec::new();
    match obj.get("data") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            data.reserve(items.len());
            data.extend(items.iter().filter_map(entry_from_value));
        }
        Some(other) => {
            return Err(VetroError::format(format!(
                "bulk 'data' must be a sequence, got {}",
                shape_of(other)
            )));
        }
    }

    Ok(BulkResponse { extra, data })
}

/// Decode one timestamp entry, or skip it with a warning.
fn entry_from_value(value: &Value) -> Option<BulkEntry> {
    let Some(obj) = value.as_object() else {
        warn_skip("timestamp entry is not an object", value);
        return None;
    };
    let Some(t) = obj.get("t").and_then(Value::as_i64) else {
        warn_skip("timestamp entry has no integer 't'", value);
        return None;
    };

    let mut bulk = Vec::new();
    match obj.get("bulk") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            bulk.extend(items.iter().filter_map(record_from_value));
        }
        Some(other) => {
            warn_skip("'bulk' is not a sequence", other);
            return None;
        }
    }

    Some(BulkEntry { t, bulk })
}

/// Decode one series record, or skip it with a warning.
fn record_from_value(value: &Value) -> Option<SeriesRecord> {
    let Some(obj) = value.as_object() else {
        warn_skip("series record is not an object", value);
        return None;
    };
    let observed = match obj.get("v") {
        Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            warn_skip("series record 'v' is not numeric or null", other);
            return None;
        }
        None => {
            warn_skip("series record has no 'v'", value);
            return None;
        }
    };

    let asset = obj.get("a").map(render_tag);
    let tags: BTreeMap<String, Value> = obj
        .iter()
        .filter(|(k, _)| k.as_str() != "a" && k.as_str() != "v")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(SeriesRecord {
        asset,
        value: observed,
        tags,
    })
}

fn shape_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[allow(unused_variables)]
fn warn_skip(reason: &str, value: &Value) {
    #[cfg(feature = "tracing")]
    tracing::warn!(reason, %value, "skipping malformed bulk record");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_data_is_empty() {
        let payload = Payload::Json(json!({"status": "ok"}));
        let resp = bulk_from_payload(&payload).unwrap();
        assert!(resp.is_empty());
        assert_eq!(resp.extra.get("status"), Some(&json!("ok")));
    }

    #[test]
    fn non_sequence_data_is_format_error() {
        let payload = Payload::Json(json!({"data": 7}));
        assert!(matches!(
            bulk_from_payload(&payload).unwrap_err(),
            VetroError::Format(_)
        ));
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let payload = Payload::Json(json!({
            "data": [
                {"t": 100, "bulk": [{"a": "BTC", "v": 1.0}, {"a": "ETH"}, "junk"]},
                {"bulk": []},
                {"t": 200, "bulk": [{"a": "BTC", "v": null}]},
            ]
        }));
        let resp = bulk_from_payload(&payload).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].bulk.len(), 1);
        assert_eq!(resp.data[1].bulk[0].value, None);
    }

    #[test]
    fn text_payload_is_format_error() {
        let payload = Payload::Text("t,v\n100,1\n".into());
        assert!(matches!(
            bulk_from_payload(&payload).unwrap_err(),
            VetroError::Format(_)
        ));
    }
}
