use interactions_shared::types::ActorId;

use crate::errors::RepositoryError;

/// Answers whether an actor has created a profile, the precondition for
/// voting.
#[async_trait::async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn has_profile(&self, actor: &ActorId) -> Result<bool, RepositoryError>;

    /// Registers a profile for `actor`. Registering twice is a no-op.
    async fn create_profile(&self, actor: &ActorId) -> Result<(), RepositoryError>;
}
