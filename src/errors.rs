use thiserror::Error;

use crate::domain::errors::DomainError;

/// Failures while bringing the service up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Opening connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Applying migrations: {0}")]
    Migrations(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
