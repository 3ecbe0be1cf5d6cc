//! Application-level errors (wraps domain errors)

use thiserror::Error;
use uuid::Uuid;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("term set not found: {0}")]
    TermSetNotFound(Uuid),

    #[error("term store failed: {context}")]
    TermStore {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
