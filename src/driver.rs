//! The Batch Driver: file enumeration and CSV input/output around the
//! [`Assembler`].
//!
//! Batches are processed one at a time, in file-name order. Each batch is
//! read, assembled and written before the next is opened; the vocabulary and
//! the known-parent index are the only state shared between batches.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::driver;
//!
//! let input = "PID,mods_titleInfo_title_ms\nimages:1,Harbor at Dusk\n";
//! let batch = driver::read_batch("batch-2.csv", input.as_bytes())?;
//! assert_eq!(batch.len(), 1);
//! assert_eq!(batch.records[0].pid(), "images:1");
//! # Ok::<(), diglib_migrate::MigrateError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::assembler::{AssembledBatch, Assembler, ExtraParents};
use crate::columns;
use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};
use crate::parent::KnownParentIndex;
use crate::record::{Batch, Record};
use crate::vocabulary::Vocabulary;

const BATCH_EXTENSION: &str = "csv";
const EXTRA_PARENTS_HEADER: [&str; 2] = ["pid", "parents"];

/// Read one batch export.
///
/// # Errors
///
/// Returns [`MigrateError::MissingColumn`] if the header has no `PID` column,
/// or a CSV error if the input is malformed.
pub fn read_batch<R: Read>(name: &str, reader: R) -> Result<Batch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
    if !headers.iter().any(|h| h == columns::PID) {
        return Err(MigrateError::MissingColumn(columns::PID.to_string()));
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(Record::from_row(headers.iter().map(String::as_str), row.iter()));
    }
    Ok(Batch::new(name, headers, records))
}

/// Read a batch export from disk; the batch is named after the file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn load_batch(path: &Path) -> Result<Batch> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MigrateError::InvalidBatchName(path.display().to_string()))?;
    read_batch(name, File::open(path)?)
}

/// Write an assembled batch projected onto the output schema.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_batch<W: Write>(batch: &AssembledBatch, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns::output_headers())?;
    for row in batch.rows() {
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the extra-parents rows of a batch. The header is written even when
/// there are no rows.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_extra_parents<W: Write>(extras: &[ExtraParents], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXTRA_PARENTS_HEADER)?;
    for extra in extras {
        csv_writer.serialize(extra)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Load the known-parent index named by the configuration. With no paths
/// configured the index is empty.
///
/// # Errors
///
/// Returns an error if a configured CSV cannot be opened or parsed.
pub fn load_known_parents(config: &MigrationConfig) -> Result<KnownParentIndex> {
    match (&config.known_parent_ids, &config.known_parent_titles) {
        (Some(ids), Some(titles)) => {
            KnownParentIndex::from_readers(File::open(ids)?, File::open(titles)?)
        },
        (Some(ids), None) => KnownParentIndex::from_readers(File::open(ids)?, "legacy,title\n".as_bytes()),
        (None, Some(titles)) => {
            KnownParentIndex::from_readers("legacy,migrated\n".as_bytes(), File::open(titles)?)
        },
        (None, None) => Ok(KnownParentIndex::new()),
    }
}

/// The `.csv` files of a directory, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn batch_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == BATCH_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Outcome of one migrated batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// File name of the batch
    pub name: String,
    /// Records written
    pub records: usize,
    /// Rows written to the extra-parents output
    pub extra_parents: usize,
}

/// A batch that could not be migrated.
#[derive(Debug)]
pub struct BatchFailure {
    /// File the failure came from
    pub path: PathBuf,
    /// What went wrong
    pub error: MigrateError,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Batches migrated, in processing order
    pub migrated: Vec<BatchSummary>,
    /// Batches that failed, in processing order
    pub failures: Vec<BatchFailure>,
}

impl RunReport {
    /// Whether every batch was migrated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Migrate one batch file, writing its output and extra-parents CSVs.
///
/// # Errors
///
/// Returns an error if the batch cannot be read, assembled or written. No
/// output file is created for a batch that fails to assemble.
pub fn migrate_file(
    path: &Path,
    assembler: &Assembler<'_>,
    config: &MigrationConfig,
) -> Result<BatchSummary> {
    let batch = load_batch(path)?;
    tracing::info!(batch = %batch.name, records = batch.len(), "migrating batch");

    let assembled = assembler.assemble(&batch)?;
    write_batch(&assembled, File::create(config.output_dir.join(&batch.name))?)?;
    write_extra_parents(
        &assembled.extra_parents,
        File::create(config.parents_dir.join(&batch.name))?,
    )?;

    let summary = BatchSummary {
        name: batch.name,
        records: assembled.records.len(),
        extra_parents: assembled.extra_parents.len(),
    };
    tracing::info!(
        batch = %summary.name,
        records = summary.records,
        extra_parents = summary.extra_parents,
        "batch migrated"
    );
    Ok(summary)
}

/// Migrate every batch in the configured directory.
///
/// Failures of individual batches are collected in the report; with
/// `fail_fast` the run stops at the first one.
///
/// # Errors
///
/// Returns an error only for problems that affect the whole run: an
/// inconsistent vocabulary, unreadable known-parent CSVs, or directories
/// that cannot be read or created.
pub fn run(config: &MigrationConfig, vocabulary: &Vocabulary) -> Result<RunReport> {
    vocabulary.validate()?;
    let known_parents = load_known_parents(config)?;
    tracing::info!(known_parents = known_parents.len(), "loaded known parents");

    fs::create_dir_all(&config.output_dir)?;
    fs::create_dir_all(&config.parents_dir)?;

    let assembler = Assembler::new(vocabulary, &known_parents, config);
    let mut report = RunReport::default();
    for path in batch_files(&config.batch_dir)? {
        match migrate_file(&path, &assembler, config) {
            Ok(summary) => report.migrated.push(summary),
            Err(error) => {
                tracing::error!(path = %path.display(), %error, "batch failed");
                report.failures.push(BatchFailure { path, error });
                if config.fail_fast {
                    break;
                }
            },
        }
    }
    Ok(report)
}
