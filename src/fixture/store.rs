use anyhow::{bail, Context, Result};
use glob::glob;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Where the email parser keeps its fixture, relative to the repo root.
pub const DEFAULT_FIXTURE_PATH: &str = "tests/testspec.yml";

/// Read the whole fixture into memory.
pub fn read_fixture(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))
}

/// Overwrite `path` with `contents`.
///
/// Writes to a temp file next to the target, then renames it over the
/// original, so a failed run never leaves a half-written fixture.
pub fn write_fixture(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing temp file {}", tmp.path().display()))?;
    tmp.flush()?;

    // keep the original permissions; the temp file is created 0600
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .with_context(|| format!("copying permissions of {}", path.display()))?;
    }

    tmp.persist(path)
        .with_context(|| format!("renaming temp file over {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "fixture written");
    Ok(())
}

/// Turn CLI path arguments into concrete files.
///
/// Arguments containing glob metacharacters are expanded (sorted, files
/// only) and must match at least one file; plain paths pass through as-is so
/// a missing file surfaces as a read error naming it.
pub fn expand_paths<S: AsRef<str>>(args: &[S]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for arg in args {
        let arg = arg.as_ref();
        if !arg.contains(['*', '?', '[']) {
            out.push(PathBuf::from(arg));
            continue;
        }

        let mut matched: Vec<PathBuf> = glob(arg)
            .with_context(|| format!("bad glob pattern {arg}"))?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            bail!("pattern {arg} matched no files");
        }
        matched.sort();
        out.extend(matched);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("testspec.yml");
        fs::write(&path, "old\n").unwrap();

        write_fixture(&path, "- emails: x\n").unwrap();
        assert_eq!(read_fixture(&path).unwrap(), "- emails: x\n");

        // no temp files left behind
        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("testspec.yml");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_fixture(&path, "new\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_read_missing_names_path() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nope.yml");
        let err = read_fixture(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yml"));
    }

    #[test]
    fn test_expand_paths() {
        let tmp = tempdir().unwrap();
        for name in ["b.yml", "a.yml", "c.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let pattern = format!("{}/*.yml", tmp.path().display());
        let plain = tmp.path().join("missing.yml").display().to_string();
        let paths = expand_paths(&[pattern, plain.clone()]).unwrap();
        assert_eq!(
            paths,
            vec![
                tmp.path().join("a.yml"),
                tmp.path().join("b.yml"),
                PathBuf::from(plain),
            ]
        );

        let none = format!("{}/*.json", tmp.path().display());
        assert!(expand_paths(&[none]).is_err());
    }
}
