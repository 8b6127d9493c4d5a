use crate::utils::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Store request failed: {0}")]
    StoreError(#[from] reqwest::Error),

    #[error("Store rejected operation with status {status}: {message}")]
    StoreRejected { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Request validation failed")]
    ValidationError(FieldErrors),

    #[error("Resource not found")]
    NotFound,

    #[error("Caller identity is missing")]
    MissingIdentity,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
