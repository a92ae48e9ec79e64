//! Error handling for the sheetscrub pipeline.
//!
//! Every fallible operation in the library returns [`Result<T>`], whose error
//! type [`ScrubError`] separates the conditions a caller may want to react to:
//!
//! ```
//! use sheetscrub::error::ScrubError;
//!
//! fn describe(err: &ScrubError) -> &'static str {
//!     match err {
//!         ScrubError::SourceRead { .. } => "could not read the table",
//!         ScrubError::SchemaConflict { .. } => "two headers collapse to one name",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! Only `SourceRead` and `SchemaConflict` abort a run. Unsupported column
//! types are reported through [`crate::analyser::logic::UnsupportedColumn`]
//! records and the pipeline carries on.

use std::fmt;

/// Main error type for sheetscrub operations.
#[derive(Debug)]
pub enum ScrubError {
    /// I/O errors (writing outputs, plot files, config files)
    Io(std::io::Error),

    /// Errors raised by polars while transforming the table
    DataProcessing(String),

    /// The table source is unreachable or cannot be parsed
    SourceRead { path: String, reason: String },

    /// Several columns end up with the same name after normalisation
    SchemaConflict { name: String, columns: Vec<String> },

    /// A type-dependent stage met a column whose dtype it cannot handle
    UnsupportedColumnType { column: String, dtype: String },

    /// Configuration errors
    Config(String),

    /// A plotting sink failed to render
    Plot(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ScrubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::SourceRead { path, reason } => {
                write!(f, "Failed to read table from '{path}': {reason}")
            }
            Self::SchemaConflict { name, columns } => write!(
                f,
                "Columns {} all normalise to '{name}'",
                columns
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::UnsupportedColumnType { column, dtype } => {
                write!(f, "Column '{column}' has unsupported type {dtype}")
            }
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Plot(msg) => write!(f, "Plot rendering error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ScrubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for ScrubError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<calamine::Error> for ScrubError {
    fn from(err: calamine::Error) -> Self {
        Self::SourceRead {
            path: String::new(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for sheetscrub operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ScrubError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ScrubError = e.into();
            ScrubError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ScrubError = e.into();
            ScrubError::Other(format!("{}: {}", f(), err))
        })
    }
}
