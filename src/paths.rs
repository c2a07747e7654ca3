use chrono::NaiveDate;
use tracing::debug;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Validates the sales data CSV path given on the command line.
///
/// # Errors
///
/// Returns [`Error::MissingArgument`] if `arg` is `None`, and
/// [`Error::InvalidSourcePath`] if it does not name an existing regular file.
pub fn resolve_source_path(arg: Option<&Path>) -> Result<PathBuf> {
    let path = arg.ok_or(Error::MissingArgument)?;
    if !path.is_file() {
        return Err(Error::InvalidSourcePath(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Returns the name of the orders directory for `date`, e.g. `Orders_2024-03-01`.
#[must_use]
pub fn output_dir_name(date: NaiveDate) -> String {
    format!("Orders_{}", date.format("%Y-%m-%d"))
}

/// Creates (if needed) and returns the orders directory for `today`.
///
/// The directory is a sibling of the source file. An existing directory is
/// reused as is; nothing in it is removed.
///
/// # Errors
///
/// Returns [`Error::Io`] if the source path cannot be made absolute or the
/// directory cannot be created.
pub fn resolve_output_dir(source: &Path, today: NaiveDate) -> Result<PathBuf> {
    let absolute = std::path::absolute(source).map_err(|err| Error::Io {
        path: source.to_path_buf(),
        source: err,
    })?;
    let parent = absolute.parent().unwrap_or_else(|| Path::new("/"));
    let dir = parent.join(output_dir_name(today));
    fs::create_dir_all(&dir).map_err(|source| Error::Io {
        path: dir.clone(),
        source,
    })?;
    debug!(dir = %dir.display(), "orders directory ready");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn resolve_source_path_fn_requires_an_argument() {
        assert!(matches!(
            resolve_source_path(None),
            Err(Error::MissingArgument)
        ));
    }

    #[test]
    fn resolve_source_path_fn_rejects_missing_file_and_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            resolve_source_path(Some(missing.as_path())),
            Err(Error::InvalidSourcePath(p)) if p == missing
        ));
        assert!(matches!(
            resolve_source_path(Some(dir.path())),
            Err(Error::InvalidSourcePath(_))
        ));
    }

    #[test]
    fn resolve_source_path_fn_accepts_existing_file() {
        let path = Path::new("testdata/sales.csv");
        assert_eq!(resolve_source_path(Some(path)).unwrap(), path);
    }

    #[test]
    fn output_dir_name_fn_uses_iso_date() {
        assert_eq!(output_dir_name(date()), "Orders_2024-03-01");
    }

    #[test]
    fn resolve_output_dir_fn_creates_sibling_directory_idempotently() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("sales.csv");
        fs::write(&source, "").unwrap();

        let out = resolve_output_dir(&source, date()).unwrap();
        assert_eq!(out, dir.path().join("Orders_2024-03-01"));
        assert!(out.is_dir());

        let keep = out.join("unrelated.txt");
        fs::write(&keep, "keep me").unwrap();
        assert_eq!(resolve_output_dir(&source, date()).unwrap(), out);
        assert_eq!(fs::read_to_string(keep).unwrap(), "keep me");
    }
}
