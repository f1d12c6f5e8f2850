use async_trait::async_trait;
use thiserror::Error;

use crate::models::Submission;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Append-only log of submitted production plans.
///
/// Records are never edited or deleted through this trait. Implementations
/// decide the storage medium; validation never depends on it.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Adds one submission after the existing ones.
    async fn append(&self, submission: &Submission) -> Result<(), RepositoryError>;

    /// Every submission, oldest first. An empty store yields an empty list.
    async fn list_all(&self) -> Result<Vec<Submission>, RepositoryError>;
}
