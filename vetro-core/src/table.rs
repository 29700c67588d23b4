use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use vetro_types::VetroError;

/// A rectangular table of observed values.
///
/// Rows are indexed by timestamp (ascending, unique); columns are named.
/// Cells are `Option<f64>`: a missing combination is an explicit `None`, never
/// silently dropped. Storage is column-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<DateTime<Utc>>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl Table {
    /// A table with zero rows and zero columns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The ascending, unique time index.
    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// The column names, in table order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values of one column, aligned with the index.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let pos = self.columns.iter().position(|c| c == name)?;
        Some(&self.cells[pos])
    }

    /// The value at (`t`, `column`). `None` for an absent row, column, or an
    /// explicitly missing cell.
    #[must_use]
    pub fn value_at(&self, t: DateTime<Utc>, column: &str) -> Option<f64> {
        let row = self.index.binary_search(&t).ok()?;
        self.column(column)?[row]
    }

    /// Convert to a polars `DataFrame` with an epoch-seconds `t` column
    /// followed by one `f64` column per table column.
    ///
    /// # Errors
    /// Returns [`VetroError::Format`] when polars rejects the frame (e.g. a
    /// duplicate column name).
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> Result<polars::prelude::DataFrame, VetroError> {
        use polars::prelude::{Column, DataFrame, Series};

        let ts: Vec<i64> = self.index.iter().map(DateTime::timestamp).collect();
        let mut cols: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        cols.push(Series::new("t".into(), ts).into());
        for (name, values) in self.columns.iter().zip(&self.cells) {
            cols.push(Series::new(name.as_str().into(), values.clone()).into());
        }
        DataFrame::new(cols).map_err(|e| VetroError::format(e.to_string()))
    }
}

/// Incremental table assembly used by the reshapers.
///
/// Columns may be declared upfront (the grouped layouts reindex every
/// sub-table to an identical column set) or discovered as cells arrive.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    rows: BTreeMap<i64, Vec<Option<f64>>>,
}

impl TableBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start with a fixed, ordered column set.
    pub(crate) fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::new();
        for name in names {
            builder.column(&name.into());
        }
        builder
    }

    /// Position of `name`, adding the column if it is new.
    pub(crate) fn column(&mut self, name: &str) -> usize {
        if let Some(&pos) = self.positions.get(name) {
            return pos;
        }
        let pos = self.columns.len();
        self.columns.push(name.to_string());
        self.positions.insert(name.to_string(), pos);
        pos
    }

    /// Set the cell at (`t`, column position). Later writes win.
    pub(crate) fn set(&mut self, t: i64, col: usize, value: Option<f64>) {
        let row = self.rows.entry(t).or_default();
        if row.len() <= col {
            row.resize(col + 1, None);
        }
        row[col] = value;
    }

    /// Register a row for `t` without setting any cell.
    pub(crate) fn touch_row(&mut self, t: i64) {
        self.rows.entry(t).or_default();
    }

    /// Freeze into a [`Table`].
    ///
    /// # Errors
    /// Returns [`VetroError::Format`] for a timestamp outside the
    /// representable datetime range.
    pub(crate) fn build(self) -> Result<Table, VetroError> {
        let width = self.columns.len();
        let mut index = Vec::with_capacity(self.rows.len());
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(self.rows.len()); width];

        for (t, mut row) in self.rows {
            let ts = DateTime::from_timestamp(t, 0).ok_or_else(|| {
                VetroError::format(format!("timestamp {t} is outside the representable range"))
            })?;
            index.push(ts);
            row.resize(width, None);
            for (col, value) in row.into_iter().enumerate() {
                cells[col].push(value);
            }
        }

        Ok(Table {
            index,
            columns: self.columns,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(sec: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(sec, 0).unwrap()
    }

    #[test]
    fn builder_pads_missing_cells() {
        let mut b = TableBuilder::new();
        let a = b.column("a");
        b.set(100, a, Some(1.0));
        let c = b.column("b");
        b.set(200, c, Some(2.0));
        let table = b.build().unwrap();

        assert_eq!(table.index(), &[ts(100), ts(200)]);
        assert_eq!(table.column("a").unwrap(), &[Some(1.0), None]);
        assert_eq!(table.column("b").unwrap(), &[None, Some(2.0)]);
    }

    #[test]
    fn rows_come_out_ascending() {
        let mut b = TableBuilder::new();
        let col = b.column("v");
        b.set(300, col, Some(3.0));
        b.set(100, col, Some(1.0));
        b.set(200, col, Some(2.0));
        let table = b.build().unwrap();
        assert_eq!(table.index(), &[ts(100), ts(200), ts(300)]);
        assert_eq!(table.column("v").unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn value_at_distinguishes_missing() {
        let mut b = TableBuilder::new();
        let col = b.column("v");
        b.set(100, col, Some(1.0));
        b.touch_row(200);
        let table = b.build().unwrap();
        assert_eq!(table.value_at(ts(100), "v"), Some(1.0));
        assert_eq!(table.value_at(ts(200), "v"), None);
        assert_eq!(table.value_at(ts(300), "v"), None);
    }

    #[test]
    fn empty_table_has_no_rows_or_columns() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
    }
}
