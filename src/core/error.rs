//! Error types and error handling for kgsplit.
//!
//! The chunking engine itself is total and never fails. Errors
//! only come from the collaborators around it: configuration,
//! document loading, extraction and persistence.

use thiserror::Error;

/// Result type alias for kgsplit operations
pub type Result<T> = std::result::Result<T, KgError>;

/// Main error type for kgsplit
#[derive(Error, Debug)]
pub enum KgError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl KgError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            KgError::DocumentNotFound(_) | KgError::InvalidPath(_)
        )
    }

    /// Check if the failed unit of work can be skipped while the
    /// surrounding batch keeps going.
    ///
    /// Configuration errors are fatal; everything scoped to a single
    /// chunk or document is not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, KgError::ConfigError(_) | KgError::TomlError(_))
    }
}
