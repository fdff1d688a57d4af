//! check_comments.rs
//!
//! Post-migration check: every email-address record in the fixture must
//! carry a `comments` field. Prints the offenders and exits non-zero if
//! there are any.

use anyhow::Result;
use std::{env, path::PathBuf, process::ExitCode};
use testspec_migrate::{fixture::DEFAULT_FIXTURE_PATH, migrate::check_file};

fn main() -> Result<ExitCode> {
    // 1) Fixture path from the first CLI argument, or the usual location
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_PATH));

    // 2) Walk the records
    let missing = check_file(&path)?;
    if missing.is_empty() {
        println!("→ {}: all records have comments", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    for loc in &missing {
        println!("  {}: {} has no comments field", path.display(), loc);
    }
    println!(
        "→ {}: {} records missing comments",
        path.display(),
        missing.len()
    );
    Ok(ExitCode::FAILURE)
}
