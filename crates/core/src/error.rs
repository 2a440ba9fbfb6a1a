// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Field-level job creation error; displays the bare user-facing message
    #[error(transparent)]
    Validation(#[from] crate::domain::ValidationError),

    #[error("A job is already being created")]
    Busy,

    #[error("Data source error: {0}")]
    DataSource(#[from] crate::port::SourceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AppError {
    /// Form field to highlight, for validation failures
    pub fn field(&self) -> Option<crate::domain::JobField> {
        match self {
            AppError::Validation(e) => Some(e.field()),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
