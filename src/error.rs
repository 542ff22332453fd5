//! Error types for the microgen crate.

use std::path::PathBuf;

/// Errors that can occur while loading, checking or generating a bean.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The schema violates a structural rule. Raised on the first violation;
    /// nothing is enriched or rendered afterwards.
    #[error("schema check failed at {location}: {message}")]
    SchemaCheck { location: String, message: String },

    /// Failed to write a generated source file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Formatting into a generated source buffer failed.
    #[error("failed to render source: {0}")]
    Render(#[from] std::fmt::Error),

    /// JSON serialization error (IR dumps).
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn check(location: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SchemaCheck {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
