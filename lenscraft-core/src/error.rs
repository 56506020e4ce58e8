//! Error types for the layout pipeline.

use thiserror::Error;

/// Errors surfaced by configuration loading and fragment processing.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("density factor must be within [0, 4], got {density_factor}")]
    InvalidConfiguration { density_factor: f64 },

    #[error("unknown reading direction '{0}', expected 'ltr' or 'rtl'")]
    InvalidDirection(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
