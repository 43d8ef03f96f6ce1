//! # Error Handling
//!
//! Error types shared by the repository layer and the pipeline stages.

use thiserror::Error;

/// Errors raised by repositories wrapping SeaORM access.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("stored {column} is not valid JSON for its type: {source}")]
    InvalidJson {
        column: &'static str,
        source: serde_json::Error,
    },
}

impl RepositoryError {
    /// Wrap a storage error without altering it.
    pub fn database_error(err: sea_orm::DbErr) -> Self {
        Self::Database(err)
    }

    /// Build a validation error from a message.
    pub fn validation_error<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }
}

/// A scope identity failed its required/non-empty checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scope: {field} is required and must not be empty")]
pub struct InvalidScope {
    pub field: &'static str,
}
