//! Error types for record operations

use bizdesk_fields::EntityType;
use bizdesk_store::StoreError;
use thiserror::Error;

/// Result type for record operations
pub type Result<T> = std::result::Result<T, RecordsError>;

/// Errors that can occur in record operations
#[derive(Debug, Error)]
pub enum RecordsError {
    /// No record with this id in the collection
    #[error("{entity} record not found: {id}")]
    RecordNotFound { entity: EntityType, id: u64 },

    /// A fixed field name that the entity does not have
    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: EntityType, field: String },

    /// A fixed field value that could not be parsed
    #[error("invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    /// Durable write failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordsError {
    /// Create a record-not-found error
    pub fn not_found(entity: EntityType, id: u64) -> Self {
        Self::RecordNotFound { entity, id }
    }

    /// Create an unknown-field error
    pub fn unknown_field(entity: EntityType, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity,
            field: field.into(),
        }
    }

    /// Create an invalid-value error
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecordsError::not_found(EntityType::Lead, 7);
        assert_eq!(err.to_string(), "leads record not found: 7");

        let err = RecordsError::unknown_field(EntityType::Account, "stage");
        assert_eq!(err.to_string(), "accounts has no field 'stage'");
    }
}
