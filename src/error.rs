//! Error types for migration operations.
//!
//! This module provides the [`MigrateError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! Only structural problems are errors. Bad data inside a cell (an invalid
//! date, a malformed URL, mismatched OLAC columns) is flagged in the output
//! record instead and never surfaces here.

use thiserror::Error;

/// Error type for all migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A column the pipeline requires is absent from the batch header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column expected to be empty on input already carries a value.
    #[error("Unexpected value in column '{column}' for {pid}: {value}")]
    UnexpectedValue {
        /// Column holding the unexpected value.
        column: String,
        /// Identifier of the offending record.
        pid: String,
        /// The value found.
        value: String,
    },

    /// More than one parent candidate matched the known-parent index.
    #[error("Ambiguous parent for {pid}: candidates {candidates:?} all match known parents")]
    AmbiguousParent {
        /// Identifier of the offending record.
        pid: String,
        /// Candidates found in the known-parent index.
        candidates: Vec<String>,
    },

    /// Vocabulary tables are inconsistent (a column routed to two tables).
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    /// A batch file name does not follow the `batch-<N>.csv` convention.
    #[error("Invalid batch name: {0}")]
    InvalidBatchName(String),

    /// CSV error from the underlying reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MigrateError`].
pub type Result<T> = std::result::Result<T, MigrateError>;
