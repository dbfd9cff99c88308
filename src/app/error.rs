use thiserror::Error;

use crate::domain::DomainError;
use crate::publisher::PublishError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] DomainError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
