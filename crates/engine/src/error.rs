//! Errors the engine can return.
//!
//! All variants are terminal for the current operation: they describe the
//! request, not a transient infrastructure condition. [`Database`] is the
//! exception and wraps store failures; callers decide on retry policy.
//!
//! [`Database`]: EngineError::Database

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The entity does not exist, or exists outside the caller's scope.
    /// The two cases are indistinguishable on purpose.
    #[error("{0} not found")]
    NotFound(String),
    /// The payload violates an entity invariant. Carries one message per
    /// failed field.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    /// A delete would break a referential invariant.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Malformed pagination or filter input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
