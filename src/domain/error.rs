//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the query and taxonomy rules.
/// These are independent of I/O and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate term path: {path}")]
    DuplicateTermPath { path: String },

    #[error("invalid boolean operator: {0} (expected And or Or)")]
    InvalidBoolOp(String),

    #[error("invalid duplicate path policy: {0} (expected first-wins, last-wins or reject)")]
    InvalidPolicy(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
