use std::io;
use thiserror::Error;

/// Errors raised while encoding or decoding a stored setting value
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed setting value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Non-finite float {0} cannot be stored as a setting value")]
    NonFiniteFloat(f64),
}

/// Errors that can occur while reading or writing settings
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("The '{key}' setting value is larger than the {limit} byte limit ({size} bytes)")]
    ValueTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read or write settings document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
