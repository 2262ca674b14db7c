//! This module defines the `VoteRepository` trait, the remote source of truth
//! for vote records.
use interactions_shared::types::{ActorId, TargetId, TargetKind, VoteFlags, VoteRecord};

use crate::errors::RepositoryError;

/// A trait that defines the interface to the remote vote record store.
///
/// Records are keyed by (actor, target). Implementors must never persist a
/// record with both flags set and must never delete a record.
#[async_trait::async_trait]
pub trait VoteRepository: Send + Sync {
    /// Retrieves the vote of `actor` on `target`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(VoteRecord))` - The stored record
    /// * `Ok(None)` - If the actor never voted on the target
    /// * `Err(RepositoryError)` - If the store could not be read
    async fn get_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
    ) -> Result<Option<VoteRecord>, RepositoryError>;

    /// Creates or replaces the vote of `actor` on `target`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The voting principal
    /// * `target` - The voted entity
    /// * `kind` - The kind of the voted entity
    /// * `flags` - The new liked/disliked pair
    ///
    /// # Returns
    ///
    /// The record as stored, including its new `last_updated` timestamp.
    async fn set_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
        flags: VoteFlags,
    ) -> Result<VoteRecord, RepositoryError>;
}
