//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostStatus;

/// Domain errors - workflow failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Post {id} was already decided ({status})")]
    AlreadyDecided { id: Uuid, status: PostStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Single-message validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}

/// Post store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Post not found")]
    NotFound,

    #[error("Corrupt post record: {0}")]
    Corrupt(String),
}
