use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid date format: {0}")]
    InvalidDate(String),
    #[error("invalid year: {0}")]
    InvalidYear(String),
}
