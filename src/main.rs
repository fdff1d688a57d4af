use anyhow::{bail, Context, Result};
use std::{env, process::ExitCode};
use testspec_migrate::{
    fixture::{expand_paths, DEFAULT_FIXTURE_PATH},
    migrate::CheckReport,
    migrate_file, MigrateOptions, Strategy,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "\
usage: testspec-migrate [--strategy structured|line-scan|regex] [--indent N]
                        [--dry-run] [--check] [--json] [PATH|GLOB ...]

Adds `comments: []` to every email-address record of a YAML test fixture
(default: tests/testspec.yml). Logging honours RUST_LOG.";

#[derive(Debug)]
struct Args {
    options: MigrateOptions,
    check_only: bool,
    json: bool,
    paths: Vec<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(raw: I) -> Result<Option<Args>> {
    let mut strategy = Strategy::default();
    let mut indent = None;
    let mut dry_run = false;
    let mut check_only = false;
    let mut json = false;
    let mut paths = Vec::new();

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--strategy" | "-s" => {
                let v = it.next().context("--strategy needs a value")?;
                strategy = match Strategy::from_str(&v) {
                    Some(s) => s,
                    None => bail!("unknown strategy {v:?}"),
                };
            }
            "--indent" => {
                let v = it.next().context("--indent needs a value")?;
                indent = Some(
                    v.parse::<usize>()
                        .with_context(|| format!("bad --indent {v:?}"))?,
                );
            }
            "--dry-run" | "-n" => dry_run = true,
            "--check" => check_only = true,
            "--json" => json = true,
            flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
            _ => paths.push(arg),
        }
    }

    if let Some(n) = indent {
        if !matches!(strategy, Strategy::Regex { .. }) {
            bail!("--indent only applies to the regex strategy");
        }
        strategy = strategy.with_indent(n);
    }
    if paths.is_empty() {
        paths.push(DEFAULT_FIXTURE_PATH.to_string());
    }

    Ok(Some(Args {
        options: MigrateOptions { strategy, dry_run },
        check_only,
        json,
        paths,
    }))
}

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) parse args ───────────────────────────────────────────────
    let args = match parse_args(env::args().skip(1)) {
        Ok(Some(a)) => a,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("{e:#}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };
    let paths = expand_paths(&args.paths)?;

    // ─── 3) check only ───────────────────────────────────────────────
    if args.check_only {
        let mut clean = true;
        for path in &paths {
            let report = CheckReport::for_file(path)?;
            if args.json {
                println!("{}", serde_json::to_string(&report)?);
            }
            if report.complete() {
                info!(path = %path.display(), "all records have comments");
                continue;
            }
            clean = false;
            for loc in &report.missing {
                error!(path = %path.display(), %loc, "missing comments");
            }
        }
        return Ok(if clean {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // ─── 4) migrate each file ────────────────────────────────────────
    for path in &paths {
        let report = migrate_file(path, &args.options)?;
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else if args.options.dry_run {
            println!(
                "Would add comments field to {} records in {}",
                report.inserted,
                path.display()
            );
        } else {
            println!(
                "Added comments field to {} records in {}",
                report.inserted,
                path.display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Option<Args>> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let a = args(&[]).unwrap().unwrap();
        assert_eq!(a.options.strategy, Strategy::Structured);
        assert!(!a.options.dry_run);
        assert_eq!(a.paths, vec![DEFAULT_FIXTURE_PATH.to_string()]);
    }

    #[test]
    fn test_regex_with_indent() {
        let a = args(&["--strategy", "regex", "--indent", "16", "-n", "spec.yml"])
            .unwrap()
            .unwrap();
        assert_eq!(a.options.strategy, Strategy::Regex { indent: 16 });
        assert!(a.options.dry_run);
        assert_eq!(a.paths, vec!["spec.yml".to_string()]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(args(&["--strategy", "sed"]).is_err());
        assert!(args(&["--indent", "4"]).is_err());
        assert!(args(&["--strategy"]).is_err());
        assert!(args(&["--frobnicate"]).is_err());
        assert!(args(&["--help"]).unwrap().is_none());
    }
}
