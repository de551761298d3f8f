//! Error types for reading token sources.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`SourceError`]
//! for failures that happen before any page reaches the reconstructor.

use thiserror::Error;

/// Error reading or decoding an upstream token source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Error reading the token file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The token file is not valid JSON.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is well-formed but not shaped like a token document.
    #[error("unsupported token document: {0}")]
    Format(String),
}
