//! Common test helpers and utilities shared across test suite.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use diglib_migrate::config::MigrationConfig;
use diglib_migrate::parent::KnownParentIndex;
use diglib_migrate::{driver, Batch};
use tempfile::TempDir;

/// Path of a fixture under `tests/data`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Loads a fixture batch.
pub fn load_fixture_batch(name: &str) -> Batch {
    driver::load_batch(&fixture(name)).expect("Could not load fixture batch")
}

/// Loads the fixture known-parent index.
#[allow(dead_code)]
pub fn fixture_known_parents() -> KnownParentIndex {
    let ids = fs::File::open(fixture("known_parent_ids.csv")).expect("ids fixture");
    let titles = fs::File::open(fixture("known_parent_titles.csv")).expect("titles fixture");
    KnownParentIndex::from_readers(ids, titles).expect("Could not load known parents")
}

/// A scratch workspace with `batches/`, `output/` and `parents/`
/// directories, and a configuration pointing at them.
#[allow(dead_code)]
pub struct Workspace {
    /// Kept alive for the duration of the test
    pub dir: TempDir,
    /// Configuration rooted in `dir`
    pub config: MigrationConfig,
}

#[allow(dead_code)]
impl Workspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let batches = dir.path().join("batches");
        fs::create_dir_all(&batches).expect("Could not create batch dir");
        let config = MigrationConfig::new()
            .with_batch_dir(batches)
            .with_output_dir(dir.path().join("output"))
            .with_parents_dir(dir.path().join("parents"));
        Workspace { dir, config }
    }

    /// Copies fixture batches into the batch directory.
    pub fn with_fixture_batches(self, names: &[&str]) -> Self {
        for name in names {
            fs::copy(fixture(name), self.config.batch_dir.join(name)).expect("Could not copy fixture");
        }
        self
    }

    /// Points the configuration at the fixture known-parent CSVs.
    pub fn with_known_parents(mut self) -> Self {
        self.config = self
            .config
            .with_known_parents(fixture("known_parent_ids.csv"), fixture("known_parent_titles.csv"));
        self
    }

    /// Writes a batch file with the given contents.
    pub fn write_batch(&self, name: &str, contents: &str) {
        fs::write(self.config.batch_dir.join(name), contents).expect("Could not write batch");
    }

    /// Reads a migrated batch back as one map per row.
    pub fn read_output(&self, name: &str) -> Vec<HashMap<String, String>> {
        read_rows(&self.config.output_dir.join(name))
    }

    /// Reads an extra-parents file back as `(pid, parents)` pairs.
    pub fn read_extra_parents(&self, name: &str) -> Vec<(String, String)> {
        let mut reader = csv::Reader::from_path(self.config.parents_dir.join(name))
            .expect("Could not open extra parents");
        reader
            .deserialize()
            .map(|row| row.expect("Bad extra parents row"))
            .collect()
    }
}

/// Reads any CSV with a header row as one map per row.
#[allow(dead_code)]
pub fn read_rows(path: &Path) -> Vec<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).expect("Could not open output");
    reader
        .deserialize()
        .map(|row| row.expect("Bad output row"))
        .collect()
}
