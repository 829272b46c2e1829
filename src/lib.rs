#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # diglib-migrate
//!
//! Migration of legacy digital-repository batch exports into a normalized
//! ingest schema.
//!
//! Each export file holds one row per repository object, with dozens of
//! MODS-derived columns whose multiple values are comma-separated. The
//! pipeline normalizes delimiters, tags name and subject columns with role and
//! entity-type qualifiers, resolves every object to a single parent,
//! normalizes and validates dates against EDTF, validates collection URLs,
//! derives file paths and controlled-vocabulary labels, and projects each
//! record onto a fixed output schema.
//!
//! ## Quick Start
//!
//! ```
//! use diglib_migrate::assembler::Assembler;
//! use diglib_migrate::config::MigrationConfig;
//! use diglib_migrate::parent::KnownParentIndex;
//! use diglib_migrate::vocabulary::Vocabulary;
//! use diglib_migrate::driver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = "\
//! PID,mods_titleInfo_title_ms,RELS_EXT_isPageOf_uri_ms,RELS_EXT_isSequenceNumber_literal_ms
//! book:1,Ship Logs,,
//! book:2,,info:fedora/book:1,3
//! ";
//! let batch = driver::read_batch("batch-1.csv", input.as_bytes())?;
//!
//! let vocabulary = Vocabulary::standard();
//! let known = KnownParentIndex::new();
//! let config = MigrationConfig::default();
//! let migrated = Assembler::new(&vocabulary, &known, &config).assemble(&batch)?;
//!
//! assert_eq!(migrated.records[1].get("parent"), "book:1");
//! assert_eq!(migrated.records[1].get("mods_titleInfo_title_ms"), "Ship Logs , Page 3");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`]: `Record` and `Batch`
//! - [`columns`]: column names and the output schema
//! - [`cell`]: delimiter and quote normalization of single cells
//! - [`vocabulary`]: role, subject and model tagging against static tables
//! - [`date`]: legacy date strings to EDTF
//! - [`edtf`]: EDTF validity checking
//! - [`validation`]: URL checks and date gating
//! - [`parent`]: single-parent resolution and the known-parent index
//! - [`identifiers`]: splitting `dc.identifier`
//! - [`assembler`]: the per-batch pipeline
//! - [`driver`]: reading and writing batch files
//! - [`config`]: run configuration
//! - [`error`]: Error types and result type

pub mod assembler;
pub mod cell;
pub mod columns;
pub mod config;
pub mod date;
pub mod driver;
pub mod edtf;
pub mod error;
pub mod identifiers;
pub mod parent;
/// Core record structures (`Record`, `Batch`)
pub mod record;
pub mod validation;
pub mod vocabulary;
pub mod vocabulary_tables;

pub use assembler::{AssembledBatch, Assembler, ExtraParents};
pub use config::MigrationConfig;
pub use error::{MigrateError, Result};
pub use parent::{IntersectionPolicy, KnownParentIndex, ParentResolution, ParentResolver};
pub use record::{Batch, BatchKind, Record, RecordBuilder};
pub use vocabulary::{ColumnTag, Vocabulary, VocabularyBuilder};
