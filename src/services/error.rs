use thiserror::Error;

use crate::api::FieldErrors;
use crate::database::DatabaseError;
use crate::patch::PatchError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    ValidationFailed {
        message: String,
        field_errors: Option<FieldErrors>,
    },

    #[error("Persistence error: {0}")]
    Persistence(DatabaseError),
}

impl ServiceError {
    pub fn validation_failed(field_errors: FieldErrors) -> Self {
        ServiceError::ValidationFailed {
            message: "One or more validation errors occurred".to_string(),
            field_errors: Some(field_errors),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // The row vanished between lookup and save
            DatabaseError::NotFound(what) => ServiceError::NotFound(format!("Not found: {}", what)),
            other => ServiceError::Persistence(other),
        }
    }
}

impl From<PatchError> for ServiceError {
    fn from(err: PatchError) -> Self {
        ServiceError::ValidationFailed {
            message: err.to_string(),
            field_errors: None,
        }
    }
}
