use serde_json::Value;

use vetro_types::{Payload, VetroError};

use crate::table::{Table, TableBuilder};
use crate::timestamp::TimeValue;

/// Convert a single-metric response into a table.
///
/// JSON input is a sequence of `{t, v}` or `{t, o: {...}}` mappings: `v`
/// yields one value column named from the last `path` segment (`value` when
/// the path has no separator); `o` contributes its keys as columns directly.
/// Text input is a header-plus-rows grid with a required `t` or `timestamp`
/// column. Empty input yields an empty table.
///
/// # Errors
/// Returns [`VetroError::Format`] for any shape outside the recognized
/// schemas, including non-numeric data cells in text input.
pub fn single_series_to_table(payload: &Payload, path: &str) -> Result<Table, VetroError> {
    match payload {
        Payload::Text(text) => table_from_text(text, path),
        Payload::Json(value) => table_from_json(value, path),
    }
}

/// Column name for the scalar (`v`) shape: the last path segment.
fn column_name_from_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => last.to_string(),
        _ => "value".to_string(),
    }
}

fn table_from_json(value: &Value, path: &str) -> Result<Table, VetroError> {
    let points = match value {
        Value::Null => return Ok(Table::empty()),
        Value::Array(points) => points,
        other => {
            return Err(VetroError::format(format!(
                "single-series payload for '{path}' is not a sequence: {other}"
            )));
        }
    };
    if points.is_empty() {
        return Ok(Table::empty());
    }

    let mut builder = TableBuilder::new();
    let scalar_column = column_name_from_path(path);

    for point in points {
        let Some(obj) = point.as_object() else {
            return Err(VetroError::format(format!(
                "single-series element is not a mapping: {point}"
            )));
        };
        let Some(t) = obj.get("t").and_then(Value::as_i64) else {
            return Err(VetroError::format(format!(
                "single-series element has no integer 't': {point}"
            )));
        };

        if let Some(v) = obj.get("v") {
            let col = builder.column(&scalar_column);
            builder.set(t, col, numeric_cell(v, "v")?);
        } else if let Some(Value::Object(fields)) = obj.get("o") {
            builder.touch_row(t);
            for (name, v) in fields {
                let col = builder.column(name);
                builder.set(t, col, numeric_cell(v, name)?);
            }
        } else {
            return Err(VetroError::format(format!(
                "single-series element has neither 'v' nor a mapping 'o': {point}"
            )));
        }
    }

    builder.build()
}

fn numeric_cell(value: &Value, name: &str) -> Result<Option<f64>, VetroError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(VetroError::format(format!(
            "'{name}' holds a non-numeric value: {other}"
        ))),
    }
}

fn table_from_text(text: &str, path: &str) -> Result<Table, VetroError> {
    if text.trim().is_empty() {
        return Ok(Table::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| VetroError::format(format!("unreadable header row: {e}")))?
        .clone();
    let time_col = headers
        .iter()
        .position(|h| h == "t" || h == "timestamp")
        .ok_or_else(|| {
            VetroError::format("text payload is missing a 't' or 'timestamp' column")
        })?;

    let data_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_col)
        .map(|(i, h)| (i, h.to_string()))
        .collect();
    if data_columns.is_empty() {
        return Err(VetroError::format(
            "text payload has a timestamp column but no data columns",
        ));
    }

    // A lone data column takes the metric's name; wider exports keep theirs.
    let mut builder = TableBuilder::new();
    let positions: Vec<(usize, usize)> = data_columns
        .iter()
        .map(|(cell, name)| {
            let label = if data_columns.len() == 1 {
                column_name_from_path(path)
            } else {
                name.clone()
            };
            (*cell, builder.column(&label))
        })
        .collect();

    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| VetroError::format(format!("unreadable row {line}: {e}")))?;
        let raw_time = record.get(time_col).unwrap_or_default();
        let t = TimeValue::from(raw_time).resolve()?;

        builder.touch_row(t);
        for (cell, col) in &positions {
            let raw = record.get(*cell).unwrap_or_default().trim();
            let value = if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<f64>().map_err(|_| {
                    VetroError::format(format!(
                        "non-numeric cell '{raw}' in column '{}'",
                        headers.get(*cell).unwrap_or_default()
                    ))
                })?)
            };
            builder.set(t, *col, value);
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_column_naming() {
        assert_eq!(column_name_from_path("market/price_usd_close"), "price_usd_close");
        assert_eq!(column_name_from_path("/market/price_usd_close"), "price_usd_close");
        assert_eq!(column_name_from_path("sopr"), "value");
    }
}
