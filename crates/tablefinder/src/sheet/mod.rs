//! Guest sheet data: typed records, CSV parsing, and the cached dataset.
//!
//! The sheet is a published spreadsheet export with at least a name column and
//! a table column. Each fetch is parsed into an immutable [`Dataset`] that
//! [`SheetCache`] swaps in as a whole.

mod cache;
mod source;
#[cfg(test)]
pub(crate) mod testing;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::config::SheetConfig;
use crate::error::{Error, Result};

pub use cache::SheetCache;
pub use source::{HttpSheetSource, SheetSource};

/// Identifier of a table as written in the sheet ("3", "A1", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Wrap a raw cell value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as written in the sheet.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the guest sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    /// Guest name; blank when the cell is empty.
    pub name: String,
    /// Assigned table.
    pub table: TableId,
}

impl GuestRecord {
    /// Create a record from a name and a table identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: TableId::new(table),
        }
    }
}

/// Which header names hold the guest name and the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumns {
    /// Header of the name column.
    pub name: String,
    /// Header of the table column.
    pub table: String,
}

impl Default for SheetColumns {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            table: "Table".to_string(),
        }
    }
}

impl From<&SheetConfig> for SheetColumns {
    fn from(config: &SheetConfig) -> Self {
        Self {
            name: config.name_column.clone(),
            table: config.table_column.clone(),
        }
    }
}

/// An immutable snapshot of the guest sheet.
///
/// Names and tables live in the same record, so the name at index `i` always
/// belongs to the table at index `i`.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<GuestRecord>,
    fetched_at: DateTime<Utc>,
    loaded_at: Instant,
}

impl Dataset {
    /// Build a dataset from already-parsed records, stamped now.
    #[must_use]
    pub fn new(records: Vec<GuestRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
            loaded_at: Instant::now(),
        }
    }

    /// Parse a CSV export.
    ///
    /// The header row must contain both configured columns (exact match, first
    /// occurrence wins). Short rows yield blank cells, cells are trimmed, and
    /// extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if a required header is absent, or
    /// [`Error::Csv`] if the document cannot be read as CSV.
    pub fn from_csv(text: &str, columns: &SheetColumns) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let position = |column: &str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| Error::missing_column(column))
        };
        let name_idx = position(&columns.name)?;
        let table_idx = position(&columns.table)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(GuestRecord::new(
                row.get(name_idx).unwrap_or_default(),
                row.get(table_idx).unwrap_or_default(),
            ));
        }

        Ok(Self::new(records))
    }

    /// All records, in sheet order.
    #[must_use]
    pub fn records(&self) -> &[GuestRecord] {
        &self.records
    }

    /// Guest names, in sheet order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }

    /// The record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&GuestRecord> {
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the sheet had no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Wall-clock time of the fetch that produced this dataset.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Whether more than `max_age` has passed since this dataset was loaded.
    #[must_use]
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.is_stale_at(Instant::now(), max_age)
    }

    /// Like [`Dataset::is_stale`], measured against `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.loaded_at) > max_age
    }
}
