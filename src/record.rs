//! Repository object records and batches.
//!
//! This module provides the core data types the pipeline operates on:
//! - [`Record`]: one repository object as an ordered column → value map
//! - [`Batch`]: the records loaded from one export file
//!
//! # Empty versus absent
//!
//! The export format cannot distinguish a missing value from an empty one, so
//! neither does this crate: the empty string is the only representation of
//! "no value", and reading a column the record does not carry yields `""`.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::Record;
//!
//! let record = Record::builder()
//!     .field("PID", "islandora:42")
//!     .field("mods_titleInfo_title_ms", "Field Notes")
//!     .build();
//!
//! assert_eq!(record.pid(), "islandora:42");
//! assert_eq!(record.get("mods_note_ms"), "");
//! assert_eq!(record.value("mods_note_ms"), None);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::{MigrateError, Result};

/// One repository object.
///
/// Fields are stored in insertion order using `IndexMap`, preserving the
/// column order of the source file so untouched columns round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Column name -> raw cell value, preserves insertion order
    pub fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Record {
            fields: IndexMap::new(),
        }
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// Build a record from a header row and a matching row of values.
    ///
    /// Values beyond the header are ignored; header columns without a value
    /// read as empty.
    #[must_use]
    pub fn from_row<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut values = values.into_iter();
        let fields = headers
            .into_iter()
            .map(|h| (h.to_string(), values.next().unwrap_or("").to_string()))
            .collect();
        Record { fields }
    }

    /// Value of a column, or `""` when the column is absent.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    /// Value of a column, or `None` when it is absent or empty.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            "" => None,
            v => Some(v),
        }
    }

    /// Whether a column is absent or empty.
    #[must_use]
    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_empty()
    }

    /// Whether the record carries the column at all, even empty.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Set a column, appending it if the record does not carry it yet.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.fields.get_mut(column) {
            *slot = value;
        } else {
            self.fields.insert(column.to_string(), value);
        }
    }

    /// Set a column only when it is currently blank.
    pub fn set_if_blank(&mut self, column: &str, value: impl Into<String>) {
        if self.is_blank(column) {
            self.set(column, value);
        }
    }

    /// The persistent identifier of the object.
    #[must_use]
    pub fn pid(&self) -> &str {
        self.get(columns::PID)
    }

    /// Iterate over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Project the record onto a list of columns, blank-filling any the
    /// record does not carry.
    #[must_use]
    pub fn project(&self, columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| self.get(c).to_string()).collect()
    }
}

/// Builder for fluently constructing [`Record`]s
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a column
    #[must_use]
    pub fn field(mut self, column: &str, value: &str) -> Self {
        self.record.set(column, value);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

/// Whether a batch is migrated as-is or needs its parents disambiguated
/// against the known-parent index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchKind {
    /// Parent linkage is trusted; the first candidate wins
    #[default]
    Ordinary,
    /// Parent linkage overlaps collections migrated ahead of this batch
    Bad,
}

impl BatchKind {
    /// Whether this is a bad batch.
    #[must_use]
    pub fn is_bad(self) -> bool {
        self == BatchKind::Bad
    }
}

/// Prefix of every batch file name.
const BATCH_PREFIX: &str = "batch-";
/// Extension of every batch file name.
const BATCH_EXTENSION: &str = ".csv";

/// The records loaded from one export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// File name of the batch, e.g. `batch-8.csv`
    pub name: String,
    /// Header row of the source file
    pub headers: Vec<String>,
    /// Records in file order
    pub records: Vec<Record>,
}

impl Batch {
    /// Create a batch from already-loaded records.
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>, records: Vec<Record>) -> Self {
        Batch {
            name: name.into(),
            headers,
            records,
        }
    }

    /// The batch number embedded in the file name (`batch-8.csv` -> `8`).
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidBatchName`] if nothing is left once the
    /// `batch-` prefix and `.csv` extension are removed.
    pub fn number(&self) -> Result<&str> {
        let name = self.name.strip_prefix(BATCH_PREFIX).unwrap_or(&self.name);
        let number = name.strip_suffix(BATCH_EXTENSION).unwrap_or(name);
        if number.is_empty() {
            return Err(MigrateError::InvalidBatchName(self.name.clone()));
        }
        Ok(number)
    }

    /// Number of records in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
