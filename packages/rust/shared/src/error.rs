//! Error types for qsocat.
//!
//! Library crates use [`CatalogueError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Schema violations found by the validator are *not* errors: they are
//! collected into per-record reports so one bad record never blocks the
//! others.

use std::path::PathBuf;

/// Top-level error type for all qsocat operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// Site configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A required input file or directory does not exist.
    #[error("missing file: {path:?} does not exist")]
    MissingFile { path: PathBuf },

    /// A mandatory template field was not supplied to the record generator.
    #[error("{key} must be defined")]
    MissingField { key: String },

    /// A supplied field has no counterpart in the template.
    #[error("{key} is not a valid key to this template")]
    UnknownField { key: String },

    /// The input table does not have the expected shape.
    #[error("table error at line {line}: {message}")]
    Table { line: u64, message: String },

    /// YAML (or CSV) content could not be parsed.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogueError>;

impl CatalogueError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    ///
    /// A `NotFound` error becomes [`CatalogueError::MissingFile`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::MissingFile { path };
        }
        Self::Io { path, source }
    }
}
