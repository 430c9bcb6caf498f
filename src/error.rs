//! Crate error type

/// Errors surfaced by configuration, persistence and session setup.
///
/// Per-frame simulation never returns these; rejected gameplay input is a
/// plain `false`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Level outside the selectable range
    #[error("Invalid level: {0} (expected 1-5)")]
    InvalidLevel(u8),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backing store missing or refused the operation
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
