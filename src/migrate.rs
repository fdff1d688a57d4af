use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::fixture::{read_fixture, write_fixture, RecordLocation, Strategy};
use crate::patch;
use crate::verify::check_text;

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
    pub strategy: Strategy,
    /// Compute and report, but leave the file alone.
    pub dry_run: bool,
}

/// What happened to one fixture file.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub path: PathBuf,
    pub strategy: String,
    pub inserted: usize,
    /// Records still lacking `comments` after the patch.
    pub missing_after: Vec<RecordLocation>,
    pub written: bool,
}

impl MigrationReport {
    pub fn complete(&self) -> bool {
        self.missing_after.is_empty()
    }
}

/// Read `path`, patch it with the configured strategy, and write it back.
///
/// The patched text must still parse as a fixture before anything is
/// written; a text strategy that broke the document fails the run and leaves
/// the file as it was.
pub fn migrate_file(path: &Path, opts: &MigrateOptions) -> Result<MigrationReport> {
    let original = read_fixture(path)?;
    let patched = patch::apply(opts.strategy, &original)?;

    let missing_after = match check_text(&patched.text) {
        Ok(m) => m,
        Err(e) => bail!(
            "{} strategy produced an unparseable fixture for {}: {e:#}",
            opts.strategy.as_str(),
            path.display()
        ),
    };
    if !missing_after.is_empty() {
        warn!(
            path = %path.display(),
            missing = missing_after.len(),
            first = %missing_after[0],
            "records still without comments"
        );
    }

    let written = patched.changed() && !opts.dry_run;
    if written {
        write_fixture(path, &patched.text)?;
    }
    info!(
        path = %path.display(),
        strategy = opts.strategy.as_str(),
        inserted = patched.inserted,
        written,
        "migrated"
    );

    Ok(MigrationReport {
        path: path.to_path_buf(),
        strategy: opts.strategy.as_str().to_string(),
        inserted: patched.inserted,
        missing_after,
        written,
    })
}

/// Post-condition check of a fixture on disk.
pub fn check_file(path: &Path) -> Result<Vec<RecordLocation>> {
    check_text(&read_fixture(path)?)
}

/// Result of `--check` for one file.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    pub missing: Vec<RecordLocation>,
}

impl CheckReport {
    pub fn for_file(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            missing: check_file(path)?,
        })
    }

    pub fn complete(&self) -> bool {
        self.missing.is_empty()
    }
}
