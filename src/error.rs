//! Error taxonomy shared by the model, the codec and the persistence glue.
//!
//! Every error is surfaced to the caller immediately. Nothing in this crate
//! retries; there are no transient failure classes in this domain.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = DispersionError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispersionError {
    /// The coefficient matrix is not 2 rows by 6 columns.
    ///
    /// `cols` reports the length of the first offending row, or 0 when there
    /// are no rows at all.
    #[error("coefficient matrix must be 2x6, got {rows} rows with {cols} columns")]
    Shape { rows: usize, cols: usize },

    /// Inverse evaluation hit a zero, NaN or infinite multiplicative term.
    ///
    /// Only produced by the checked evaluation path; plain evaluation lets IEEE
    /// infinity/NaN through.
    #[error("inverse evaluation is degenerate at x={x}, y={y}: multiplicative term is zero or not finite")]
    ArithmeticDegenerate { x: f64, y: f64 },

    #[error("record is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("record field `{field}` is invalid: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("batch inputs differ in length: x={x}, y={y}, t={t}")]
    LengthMismatch { x: usize, y: usize, t: usize },

    /// A schema resource could not be read or parsed during registration.
    #[error("failed to load resource '{}': {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },

    #[error("no converter handles tag `{tag}`")]
    UnsupportedTag { tag: String },

    #[error("schema `{uri}` is not registered")]
    UnknownSchema { uri: String },

    #[error("tree does not conform to `{schema_uri}`: {message}")]
    Validation { schema_uri: String, message: String },

    #[error("malformed document: {0}")]
    Format(String),

    #[error("failed to {action} '{}'", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tag pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DispersionError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DispersionError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn resource_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DispersionError::ResourceLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
