use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid date format: {0}")]
    InvalidFormat(String),
    #[error("invalid year: {0}")]
    InvalidYear(String),
    #[error("holiday already exists on {0}")]
    Duplicate(String),
    #[error("no holidays for year {0}")]
    YearNotFound(String),
    #[error("holiday not found on {0}")]
    HolidayNotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::InvalidDate(d) => Self::InvalidFormat(d),
            models::errors::ModelError::InvalidYear(y) => Self::InvalidYear(y),
        }
    }
}
