//! Custom error types for the listings ETL pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Row-level
//! problems (unparseable numbers, unresolved prices, out-of-range ratings)
//! never surface here: the cleaner resolves them in place. What does surface
//! is fatal for the run - an unreadable source or a schema violation.
//!
//! Errors are serializable so a report sink can carry them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the ETL pipeline.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Source file does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// Source file has an extension no loader understands.
    #[error("Unsupported file format for '{0}'")]
    UnsupportedFormat(String),

    /// Spreadsheet could not be opened or read.
    #[error("Failed to read workbook '{path}': {reason}")]
    Workbook { path: String, reason: String },

    /// Columns the cleaning stages depend on are absent.
    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// Host-registration date did not match the expected format.
    #[error(
        "Malformed date in column '{column}' at row {row}: '{value}' does not match '{expected_format}'"
    )]
    MalformedDate {
        column: String,
        row: usize,
        value: String,
        expected_format: String,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with operator-facing context (source path, stage).
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EtlError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for report sinks.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Workbook { .. } => "WORKBOOK_ERROR",
            Self::MissingColumns(_) => "MISSING_COLUMNS",
            Self::MalformedDate { .. } => "MALFORMED_DATE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error means the input itself violates the expected schema,
    /// as opposed to an environment failure (missing file, IO).
    pub fn is_schema_violation(&self) -> bool {
        match self {
            Self::MissingColumns(_) | Self::MalformedDate { .. } => true,
            Self::WithContext { source, .. } => source.is_schema_violation(),
            _ => false,
        }
    }
}

impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for ETL operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Polars(e).with_context(context))
    }
}
