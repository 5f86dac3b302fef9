//! Error types for keyed storage

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key is empty or would escape the storage root
    #[error("invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Backend refused the write (quota exhausted, read-only medium)
    #[error("write refused for key '{key}': {reason}")]
    WriteRefused { key: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create a write-refused error
    pub fn write_refused(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteRefused {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidKey { key: "../x".into() };
        assert_eq!(err.to_string(), "invalid storage key: \"../x\"");
    }

    #[test]
    fn test_write_refused() {
        let err = StoreError::write_refused("leads", "quota exceeded");
        assert!(err.to_string().contains("leads"));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
