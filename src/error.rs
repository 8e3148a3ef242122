//! Typed errors raised by the library layer.
//!
//! The CLI wraps these in `anyhow` with file or line context; `main` only
//! needs to tell [`MetadataError`] apart to pick its exit status.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Only raised in legacy relabel mode.
    #[error("expected a target list or a target with a source, found {found}")]
    UnexpectedTarget { found: String },

    #[error("annotation must be a JSON object, found {found}")]
    NotAnObject { found: String },
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(
        "Missing 'iiifBaseUrlPerPage' or 'manifestUrlPerPage' keys in metadata file {}",
        .path.display()
    )]
    MissingKeys { path: PathBuf },
}

/// Short description of a JSON value's kind, used in error messages.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(s) => format!("the string {:?}", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object without a source".to_string(),
    }
}
