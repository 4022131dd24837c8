use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("corrupt row: {0}")]
    CorruptRow(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),
}

impl ServiceError {
    pub fn not_found(id: &str) -> Self { Self::NotFound(format!("payment {} not found", id)) }
    pub fn already_exists(id: &str) -> Self { Self::AlreadyExists(format!("payment {} already exists", id)) }
    pub fn storage(e: impl std::fmt::Display) -> Self { Self::StorageUnavailable(e.to_string()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidCurrency(code) => Self::InvalidCurrency(code),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self { Self::storage(e) }
}
