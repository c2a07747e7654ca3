use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a run. None of these are recovered internally:
/// the first error aborts the run, leaving any files already written in place.
#[derive(Debug, Error)]
pub enum Error {
    /// No sales data CSV path was given on the command line.
    #[error("missing path to sales data CSV file")]
    MissingArgument,

    /// The given path does not name an existing regular file.
    #[error("invalid path to sales data CSV file: {}", .0.display())]
    InvalidSourcePath(PathBuf),

    /// The header row lacks one or more required columns.
    #[error(
        "{}: missing required column(s): {}",
        path.display(),
        missing.join(", ")
    )]
    Schema { path: PathBuf, missing: Vec<String> },

    /// A row could not be read or a field could not be deserialized.
    #[error("reading {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A price field is not a valid dollar amount.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// A total price or grand total is too large to represent.
    #[error("amount overflow computing {0}")]
    Overflow(String),

    /// Directory creation or another filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet writer failed to build or save a workbook.
    #[error("writing {}: {source}", path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_every_missing_column() {
        let err = Error::Schema {
            path: PathBuf::from("sales.csv"),
            missing: vec!["ITEM PRICE".into(), "CITY".into()],
        };
        assert_eq!(
            err.to_string(),
            "sales.csv: missing required column(s): ITEM PRICE, CITY"
        );
    }

    #[test]
    fn missing_argument_message_is_user_facing() {
        assert_eq!(
            Error::MissingArgument.to_string(),
            "missing path to sales data CSV file"
        );
    }
}
