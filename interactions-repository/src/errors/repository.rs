//! Error types for the remote stores.
use interactions_shared::TypeError;
use interactions_shared::types::TargetKind;
use thiserror::Error;

/// Represents errors that can occur within the remote vote, counter and
/// profile stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidValue(#[from] TypeError),

    #[error("Actor {0} is not eligible to vote")]
    NotEligible(String),

    #[error("Target {target} is a {stored}, not a {requested}")]
    KindMismatch {
        target: String,
        stored: TargetKind,
        requested: TargetKind,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether the failure is transient, i.e. the remote could not be reached
    /// rather than rejecting the request.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::DatabaseError(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}
