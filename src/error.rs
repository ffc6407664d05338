use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the conversion of a single document or an export
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read annotation file ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse annotation file ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to create directory ({}): {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("category type '{0}' not found in document categories")]
    MissingCategory(String),

    #[error("class id '{0}' is not an integer")]
    InvalidClassId(String),
}

impl ConvertError {
    /// True for failures loading the input document
    pub fn is_load_error(&self) -> bool {
        matches!(self, ConvertError::Read { .. } | ConvertError::Parse { .. })
    }
}

/// A frame whose annotations cannot yield a class id
#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    #[error("frame annotations are not a list: {0}")]
    NotAList(Value),

    #[error("annotation tuple is not a list: {0}")]
    TupleNotAList(Value),

    #[error("leading annotation value is not an integer class id: {0}")]
    NotAnInteger(Value),
}
