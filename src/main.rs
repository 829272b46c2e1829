//! diglib-migrate - command-line entry point
//!
//! Migrates every `batch-<N>.csv` export in a directory into the normalized
//! ingest schema, writing one migrated CSV and one extra-parents CSV per
//! batch.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use diglib_migrate::config::MigrationConfig;
use diglib_migrate::driver;
use diglib_migrate::parent::IntersectionPolicy;
use diglib_migrate::vocabulary::Vocabulary;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for diglib-migrate
#[derive(Parser, Debug)]
#[command(name = "diglib-migrate")]
#[command(about = "Migrate legacy digital-repository batch exports to the ingest schema")]
#[command(version)]
struct Args {
    /// Directory holding the batch-<N>.csv exports
    #[arg(long, default_value = "batches", env = "DIGLIB_BATCH_DIR")]
    batch_dir: PathBuf,

    /// Directory for migrated batches
    #[arg(long, default_value = "output", env = "DIGLIB_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Directory for extra-parents CSVs
    #[arg(long, default_value = "parents", env = "DIGLIB_PARENTS_DIR")]
    parents_dir: PathBuf,

    /// CSV of legacy parent id -> migrated id, used for bad batches
    #[arg(long, env = "DIGLIB_KNOWN_PARENT_IDS")]
    known_parent_ids: Option<PathBuf>,

    /// CSV of legacy parent id -> title, used for bad batches
    #[arg(long, env = "DIGLIB_KNOWN_PARENT_TITLES")]
    known_parent_titles: Option<PathBuf>,

    /// Root of the media store used in derived file paths
    #[arg(long, default_value = diglib_migrate::config::DEFAULT_MEDIA_ROOT, env = "DIGLIB_MEDIA_ROOT")]
    media_root: String,

    /// Prefix of the path alias
    #[arg(long, default_value = diglib_migrate::config::DEFAULT_ALIAS_PREFIX, env = "DIGLIB_ALIAS_PREFIX")]
    alias_prefix: String,

    /// Handling of several known parents: strict, flag or first-match
    #[arg(long, default_value_t = IntersectionPolicy::Flag, env = "DIGLIB_INTERSECTION_POLICY")]
    intersection_policy: IntersectionPolicy,

    /// Stop at the first failing batch
    #[arg(long, env = "DIGLIB_FAIL_FAST")]
    fail_fast: bool,
}

impl Args {
    fn into_config(self) -> MigrationConfig {
        let mut config = MigrationConfig::new()
            .with_batch_dir(self.batch_dir)
            .with_output_dir(self.output_dir)
            .with_parents_dir(self.parents_dir)
            .with_media_root(self.media_root)
            .with_alias_prefix(self.alias_prefix)
            .with_intersection_policy(self.intersection_policy)
            .with_fail_fast(self.fail_fast);
        config.known_parent_ids = self.known_parent_ids;
        config.known_parent_titles = self.known_parent_titles;
        config
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();
    info!("Migrating batches from {}", config.batch_dir.display());

    let vocabulary = Vocabulary::standard();
    let report = driver::run(&config, &vocabulary).with_context(|| {
        format!(
            "Failed to migrate batches in {}",
            config.batch_dir.display()
        )
    })?;

    info!(
        "Migrated {} batch(es), {} failed",
        report.migrated.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        error!("{}: {}", failure.path.display(), failure.error);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
