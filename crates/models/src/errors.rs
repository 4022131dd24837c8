use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),
}
