use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("InputNotFound: input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("MalformedRecord: expected at least {expected} fields, found {found}{}", AtRow(*row))]
    MalformedRecord {
        row: Option<u64>,
        found: usize,
        expected: usize,
    },

    #[error("MalformedTimestamp: cannot parse created timestamp {value:?}{}: {source}", AtRow(*row))]
    MalformedTimestamp {
        row: Option<u64>,
        value: String,
        source: chrono::ParseError,
    },

    #[error("OutputUnwritable: cannot write {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IOFailure: {0}")]
    Io(#[from] std::io::Error),

    #[error("MalformedRecord: invalid delimited text{}: {source}", AtRow(*row))]
    Csv { row: Option<u64>, source: csv::Error },

    #[error("MalformedRecord: text is not valid UTF-8{}: {source}", AtRow(*row))]
    InvalidText {
        row: Option<u64>,
        source: csv::FromUtf8Error,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ConvertError::Io(std::io::Error::from(err))
        } else {
            ConvertError::Csv {
                row: None,
                source: err,
            }
        }
    }
}

impl ConvertError {
    /// Attaches the 1-based data row number to row-level errors that lack one.
    pub fn at_row(mut self, at: u64) -> Self {
        match &mut self {
            ConvertError::MalformedRecord { row, .. }
            | ConvertError::MalformedTimestamp { row, .. }
            | ConvertError::Csv { row, .. }
            | ConvertError::InvalidText { row, .. } => {
                row.get_or_insert(at);
            }
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InputNotFound { .. } => "InputNotFound",
            ConvertError::MalformedRecord { .. }
            | ConvertError::Csv { .. }
            | ConvertError::InvalidText { .. } => "MalformedRecord",
            ConvertError::MalformedTimestamp { .. } => "MalformedTimestamp",
            ConvertError::OutputUnwritable { .. } => "OutputUnwritable",
            ConvertError::Io(_) => "IOFailure",
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConvertError::InputNotFound { .. } => {
                "Check that the path points to an existing export file"
            }
            ConvertError::MalformedRecord { .. }
            | ConvertError::Csv { .. }
            | ConvertError::InvalidText { .. } => {
                "Make sure the file is an unmodified ratings export with 16 columns per row"
            }
            ConvertError::MalformedTimestamp { .. } => {
                "The created column must look like \"Wed Aug 21 12:55:59 2013\""
            }
            ConvertError::OutputUnwritable { .. } => {
                "Check write permissions on the directory next to the input file"
            }
            ConvertError::Io(_) => "Check the disk and file system, then retry",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::InputNotFound { .. } => 2,
            ConvertError::MalformedRecord { .. }
            | ConvertError::MalformedTimestamp { .. }
            | ConvertError::Csv { .. }
            | ConvertError::InvalidText { .. } => 3,
            ConvertError::OutputUnwritable { .. } => 4,
            ConvertError::Io(_) => 5,
        }
    }
}

struct AtRow(Option<u64>);

impl fmt::Display for AtRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(row) => write!(f, " at row {}", row),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_timestamp() -> ConvertError {
        let source = chrono::NaiveDateTime::parse_from_str("x", "%Y").unwrap_err();
        ConvertError::MalformedTimestamp {
            row: None,
            value: "not a date".to_string(),
            source,
        }
    }

    #[test]
    fn test_at_row_fills_missing_row() {
        let err = bad_timestamp().at_row(7);
        let message = err.to_string();
        assert!(message.starts_with("MalformedTimestamp"));
        assert!(message.contains("\"not a date\" at row 7"));
    }

    #[test]
    fn test_at_row_keeps_existing_row() {
        let err = ConvertError::MalformedRecord {
            row: Some(2),
            found: 3,
            expected: 16,
        }
        .at_row(9);
        assert!(matches!(err, ConvertError::MalformedRecord { row: Some(2), .. }));
    }

    #[test]
    fn test_at_row_reaches_csv_errors() {
        let csv_err = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"\xff,x"[..])
            .records()
            .next()
            .unwrap()
            .unwrap_err();

        let err = ConvertError::from(csv_err).at_row(4);
        assert_eq!(err.kind(), "MalformedRecord");
        assert!(matches!(err, ConvertError::Csv { row: Some(4), .. }));
        assert!(err.to_string().contains("at row 4"));
    }

    #[test]
    fn test_kind_and_exit_code() {
        let err = ConvertError::InputNotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.kind(), "InputNotFound");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing.csv"));

        let err = ConvertError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.kind(), "IOFailure");
        assert_ne!(err.exit_code(), 0);
    }
}
