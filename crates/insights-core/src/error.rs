use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Campaign Insights.
///
/// Every loader variant is fatal: the caller aborts the run and no partial
/// dataset is produced.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// An input file does not exist.
    #[error("File not found: {0}")]
    SourceNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the CSV header row.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A cell could not be parsed into the column's type, or parsed to a
    /// non-finite number.
    #[error("Invalid value '{value}' for column '{column}' in {path} line {line}")]
    InvalidValue {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// A cell parsed, but adding it to its column total (or dividing revenue
    /// by spend) leaves the representable range.
    #[error("Value '{value}' for column '{column}' in {path} line {line} is out of range")]
    OutOfRange {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// The CSV reader rejected the file structure.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The interactive terminal could not be set up, drawn or restored.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InsightsError {
    /// `true` for the load-time failures that must abort a run.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            InsightsError::SourceNotFound(_)
                | InsightsError::FileRead { .. }
                | InsightsError::MissingColumn { .. }
                | InsightsError::InvalidValue { .. }
                | InsightsError::OutOfRange { .. }
                | InsightsError::Csv(_)
        )
    }
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = InsightsError::FileRead {
            path: PathBuf::from("analitica/datos_publicidad.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("analitica/datos_publicidad.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_source_not_found() {
        let err = InsightsError::SourceNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "File not found: missing.csv");
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = InsightsError::MissingColumn {
            path: PathBuf::from("ads.csv"),
            column: "gasto_ars".to_string(),
        };
        assert_eq!(err.to_string(), "Missing column 'gasto_ars' in ads.csv");
    }

    #[test]
    fn test_error_display_invalid_value() {
        let err = InsightsError::InvalidValue {
            path: PathBuf::from("ads.csv"),
            line: 3,
            column: "clicks".to_string(),
            value: "many".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'many' for column 'clicks' in ads.csv line 3"
        );
    }

    #[test]
    fn test_error_display_out_of_range() {
        let err = InsightsError::OutOfRange {
            path: PathBuf::from("ads.csv"),
            line: 4,
            column: "gasto_ars".to_string(),
            value: "1e308".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Value '1e308' for column 'gasto_ars' in ads.csv line 4 is out of range"
        );
        assert!(err.is_load_error());
    }

    #[test]
    fn test_error_display_terminal() {
        let err = InsightsError::Terminal("raw mode unavailable".to_string());
        assert_eq!(err.to_string(), "Terminal error: raw mode unavailable");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InsightsError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_load_error());
    }

    #[test]
    fn test_load_error_classification() {
        assert!(InsightsError::SourceNotFound(PathBuf::from("x")).is_load_error());
        assert!(InsightsError::MissingColumn {
            path: PathBuf::from("x"),
            column: "canal".to_string(),
        }
        .is_load_error());
        assert!(!InsightsError::Terminal("x".to_string()).is_load_error());
    }
}
