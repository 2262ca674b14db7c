//! Errors raised while persisting a toggle or reading the stores.
use interactions_repository::RepositoryError;
use interactions_shared::TypeError;
use interactions_shared::types::{TargetId, TargetKind};
use thiserror::Error;

/// Represents errors that can occur within the controller and its store
/// adapters.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid vote: {0}")]
    InvalidVote(#[from] TypeError),

    #[error("Counter update for {target} gave up after {attempts} conflicting attempts")]
    CounterContention { target: String, attempts: u32 },

    #[error("Target {target} is a {tracked}, not a {requested}")]
    KindMismatch {
        target: TargetId,
        tracked: TargetKind,
        requested: TargetKind,
    },

    #[error("Controller has shut down")]
    ShutDown,
}
