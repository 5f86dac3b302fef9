//! Error types for custom field layouts

use bizdesk_store::StoreError;
use thiserror::Error;

/// Result type for field layout operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field layout operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field not found by id
    #[error("field not found: {id}")]
    FieldNotFound { id: String },

    /// Entity type name not recognised
    #[error("unknown entity type: {name}")]
    UnknownEntity { name: String },

    /// Field type name not recognised
    #[error("unknown field type: {name}")]
    UnknownKind { name: String },

    /// Layout builder action not valid in the current session state
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    /// Durable write failed; the in-memory layout was left unchanged
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldsError {
    /// Create an invalid state error
    pub fn invalid_state(action: &'static str, state: &'static str) -> Self {
        Self::InvalidState { action, state }
    }

    /// Whether the failure came from the storage backend.
    ///
    /// Callers use this to keep an unsaved draft on screen instead of
    /// discarding it.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::FieldNotFound { id: "f1".into() };
        assert_eq!(err.to_string(), "field not found: f1");
    }

    #[test]
    fn test_invalid_state() {
        let err = FieldsError::invalid_state("commit", "idle");
        assert_eq!(err.to_string(), "cannot commit while idle");
        assert!(!err.is_storage_failure());
    }

    #[test]
    fn test_storage_failure() {
        let err = FieldsError::from(StoreError::write_refused("leads_custom_fields", "full"));
        assert!(err.is_storage_failure());
    }
}
