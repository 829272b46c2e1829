//! Configuration options for a migration run.
//!
//! This module provides the [`MigrationConfig`] struct which controls where
//! batches are read from and written to, how derived paths are built, and how
//! anomalies are handled.

use std::path::PathBuf;

use crate::parent::IntersectionPolicy;

/// Default root of the legacy media store, as mounted on the ingest host.
pub const DEFAULT_MEDIA_ROOT: &str = "/mnt/legacy-data/media";

/// Default prefix of the legacy object URL, used for path aliases.
pub const DEFAULT_ALIAS_PREFIX: &str = "/islandora/object/";

/// Configuration for a migration run.
///
/// # Examples
///
/// ```
/// use diglib_migrate::config::MigrationConfig;
/// use diglib_migrate::parent::IntersectionPolicy;
///
/// let config = MigrationConfig::new()
///     .with_batch_dir("exports")
///     .with_output_dir("cleaned")
///     .with_intersection_policy(IntersectionPolicy::Strict);
///
/// assert_eq!(config.media_root, "/mnt/legacy-data/media");
/// assert!(!config.fail_fast);
/// ```
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    // === Locations ===
    /// Directory holding the `batch-<N>.csv` exports.
    pub batch_dir: PathBuf,

    /// Directory the migrated batches are written to, one file per batch
    /// under the batch's own name.
    pub output_dir: PathBuf,

    /// Directory the extra-parents CSVs are written to.
    pub parents_dir: PathBuf,

    /// CSV mapping legacy parent identifiers to migrated identifiers.
    ///
    /// When `None`, bad batches are resolved against an empty index and
    /// every candidate is treated as an ordinary parent.
    pub known_parent_ids: Option<PathBuf>,

    /// CSV mapping legacy parent identifiers to titles.
    pub known_parent_titles: Option<PathBuf>,

    // === Derived values ===
    /// Root of the media store embedded in derived file paths.
    pub media_root: String,

    /// Prefix prepended to the PID to form the path alias.
    pub alias_prefix: String,

    // === Error Handling ===
    /// What to do when several parent candidates are known parents.
    pub intersection_policy: IntersectionPolicy,

    /// Stop on the first failing batch.
    ///
    /// When false (default), failures are collected and the remaining
    /// batches are still processed.
    pub fail_fast: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_dir: PathBuf::from("batches"),
            output_dir: PathBuf::from("output"),
            parents_dir: PathBuf::from("parents"),
            known_parent_ids: None,
            known_parent_titles: None,
            media_root: DEFAULT_MEDIA_ROOT.to_string(),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            intersection_policy: IntersectionPolicy::default(),
            fail_fast: false,
        }
    }
}

impl MigrationConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input directory.
    #[must_use]
    pub fn with_batch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.batch_dir = dir.into();
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the extra-parents directory.
    #[must_use]
    pub fn with_parents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parents_dir = dir.into();
        self
    }

    /// Sets the two known-parent CSVs.
    #[must_use]
    pub fn with_known_parents(
        mut self,
        ids: impl Into<PathBuf>,
        titles: impl Into<PathBuf>,
    ) -> Self {
        self.known_parent_ids = Some(ids.into());
        self.known_parent_titles = Some(titles.into());
        self
    }

    /// Sets the media root used in derived file paths.
    #[must_use]
    pub fn with_media_root(mut self, root: impl Into<String>) -> Self {
        self.media_root = root.into();
        self
    }

    /// Sets the path alias prefix.
    #[must_use]
    pub fn with_alias_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alias_prefix = prefix.into();
        self
    }

    /// Sets the policy for several intersecting known parents.
    #[must_use]
    pub const fn with_intersection_policy(mut self, policy: IntersectionPolicy) -> Self {
        self.intersection_policy = policy;
        self
    }

    /// Enables fail-fast error handling.
    #[must_use]
    pub const fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MigrationConfig::default();
        assert_eq!(config.media_root, DEFAULT_MEDIA_ROOT);
        assert_eq!(config.alias_prefix, DEFAULT_ALIAS_PREFIX);
        assert!(config.known_parent_ids.is_none());
        assert_eq!(config.intersection_policy, IntersectionPolicy::Flag);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MigrationConfig::new()
            .with_media_root("/srv/media")
            .with_known_parents("ids.csv", "titles.csv")
            .with_fail_fast(true);
        assert_eq!(config.media_root, "/srv/media");
        assert_eq!(config.known_parent_ids, Some(PathBuf::from("ids.csv")));
        assert_eq!(config.known_parent_titles, Some(PathBuf::from("titles.csv")));
        assert!(config.fail_fast);
    }
}
