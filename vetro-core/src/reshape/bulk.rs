use std::collections::{BTreeMap, BTreeSet};

use vetro_types::{BulkLayout, BulkResponse, SeriesRecord, VetroError};

use crate::table::{Table, TableBuilder};

/// Label used for records whose privileged asset tag is absent.
const NULL_ASSET_LABEL: &str = "None";

/// Label used for records whose non-asset tag set is empty.
const EMPTY_KEY_LABEL: &str = "value";

/// A reshaped bulk result: one wide table, or one sub-table per group.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkTable {
    /// One column per (asset, series-key) pair.
    Wide(Table),
    /// One sub-table per asset or per series key, depending on the layout.
    Grouped(BTreeMap<String, Table>),
}

impl BulkTable {
    /// The wide table, when this result has the wide layout.
    #[must_use]
    pub const fn as_wide(&self) -> Option<&Table> {
        match self {
            Self::Wide(t) => Some(t),
            Self::Grouped(_) => None,
        }
    }

    /// The group mapping, when this result has a grouped layout.
    #[must_use]
    pub const fn as_grouped(&self) -> Option<&BTreeMap<String, Table>> {
        match self {
            Self::Wide(_) => None,
            Self::Grouped(m) => Some(m),
        }
    }
}

/// One long-form row: one series record at one instant.
///
/// `tag_key` is the key derived from the non-asset tags alone; it is `None`
/// for an empty tag set so each layout can apply its own fallback (the wide
/// layout falls back to the asset, the grouped layouts to a placeholder,
/// since there the asset is already the other dimension).
#[derive(Debug, Clone)]
struct FlatRecord {
    t: i64,
    asset: Option<String>,
    tag_key: Option<String>,
    value: Option<f64>,
}

/// Reshape a bulk response into the requested layout.
///
/// The response is flattened once into long-form records; only the final
/// grouping differs per layout. Sub-tables of the grouped layouts are
/// reindexed so every one carries the identical column set and the identical
/// time index, with missing combinations as explicit `None` cells.
///
/// # Errors
/// Returns [`VetroError::Format`] when a timestamp cannot be represented as a
/// datetime.
pub fn bulk_to_table(response: &BulkResponse, layout: BulkLayout) -> Result<BulkTable, VetroError> {
    let records = flatten(response);

    match layout {
        BulkLayout::Wide => Ok(BulkTable::Wide(pivot_wide(&records)?)),
        BulkLayout::ByAsset => Ok(BulkTable::Grouped(pivot_grouped(
            &records,
            |r| asset_label(r).to_string(),
            |r| key_label(r).to_string(),
        )?)),
        BulkLayout::BySeriesKey => Ok(BulkTable::Grouped(pivot_grouped(
            &records,
            |r| key_label(r).to_string(),
            |r| asset_label(r).to_string(),
        )?)),
    }
}

fn flatten(response: &BulkResponse) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    for entry in &response.data {
        for record in &entry.bulk {
            records.push(FlatRecord {
                t: entry.t,
                asset: record.asset.clone(),
                tag_key: tag_key(record),
                value: record.value,
            });
        }
    }
    records
}

/// The series key from the non-asset tags alone, `None` for an empty tag set.
fn tag_key(record: &SeriesRecord) -> Option<String> {
    if record.tags.is_empty() {
        None
    } else {
        Some(record.series_key())
    }
}

fn asset_label(record: &FlatRecord) -> &str {
    record.asset.as_deref().unwrap_or(NULL_ASSET_LABEL)
}

fn key_label(record: &FlatRecord) -> &str {
    record.tag_key.as_deref().unwrap_or(EMPTY_KEY_LABEL)
}

/// Column name in the wide layout: `asset_key`, collapsing to the bare key
/// when there is no asset to prefix, and to the bare asset when there are no
/// tags to suffix (never `BTC_BTC`).
fn wide_column_name(record: &FlatRecord) -> String {
    match (&record.asset, &record.tag_key) {
        (None, None) => EMPTY_KEY_LABEL.to_string(),
        (None, Some(key)) => key.clone(),
        (Some(asset), None) => asset.clone(),
        (Some(asset), Some(key)) if key == asset => key.clone(),
        (Some(asset), Some(key)) => format!("{asset}_{key}"),
    }
}

fn pivot_wide(records: &[FlatRecord]) -> Result<Table, VetroError> {
    if records.is_empty() {
        return Ok(Table::empty());
    }

    let names: BTreeSet<String> = records.iter().map(wide_column_name).collect();
    let mut builder = TableBuilder::with_columns(names);
    for record in records {
        let col = builder.column(&wide_column_name(record));
        builder.set(record.t, col, record.value);
    }
    builder.build()
}

/// Pivot into one sub-table per `group_of`, with `column_of` as the columns.
fn pivot_grouped(
    records: &[FlatRecord],
    group_of: impl Fn(&FlatRecord) -> String,
    column_of: impl Fn(&FlatRecord) -> String,
) -> Result<BTreeMap<String, Table>, VetroError> {
    let columns: BTreeSet<String> = records.iter().map(&column_of).collect();
    let timestamps: BTreeSet<i64> = records.iter().map(|r| r.t).collect();

    let mut grouped: BTreeMap<String, Vec<&FlatRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(group_of(record)).or_default().push(record);
    }

    let mut tables = BTreeMap::new();
    for (group, members) in grouped {
        let mut builder = TableBuilder::with_columns(columns.iter().cloned());
        for &t in &timestamps {
            builder.touch_row(t);
        }
        for record in members {
            let col = builder.column(&column_of(record));
            builder.set(record.t, col, record.value);
        }
        tables.insert(group, builder.build()?);
    }
    Ok(tables)
}
