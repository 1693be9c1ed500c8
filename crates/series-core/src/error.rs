// File: crates/series-core/src/error.rs
// Summary: Error types for binding resolution and configuration loading.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Invalid binding path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Property not found: {0}")]
    NotFound(String),

    #[error("Path '{0}' resolves to a list where a scalar is required")]
    ListTerminal(String),

    #[error("Index {index} out of bounds (len {len}) in path '{path}'")]
    IndexOutOfBounds { path: String, index: usize, len: usize },

    #[error("Value at '{0}' is not numeric")]
    NotNumeric(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, BindingError>;
