//! Vote Record Store adapter.
//!
//! Reads go to the remote `VoteRepository` and are mirrored into the
//! session's `LocalVoteCache`. The remote is authoritative whenever it
//! answers; the cache only stands in when it does not.
use std::sync::Arc;

use chrono::Utc;
use interactions_repository::{LocalVoteCache, VoteRepository};
use interactions_shared::types::{
    ActorId, CachedVote, TargetId, TargetKind, VoteFlags, VoteRecord,
};
use tracing::{debug, instrument, warn};

use crate::errors::ControllerError;

/// Where a looked-up vote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Cache,
}

/// The result of `VoteRecordStore::get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLookup {
    pub flags: VoteFlags,
    pub source: Source,
}

/// Remote vote records with a local read-through mirror.
pub struct VoteRecordStore {
    remote: Arc<dyn VoteRepository>,
    cache: Arc<dyn LocalVoteCache>,
}

impl VoteRecordStore {
    pub fn new(remote: Arc<dyn VoteRepository>, cache: Arc<dyn LocalVoteCache>) -> Self {
        Self { remote, cache }
    }

    /// Makes sure the cache holds `actor`'s votes, resetting it if it held
    /// another actor's or nobody's. Returns `false` when it was reset.
    fn claim_cache(&self, actor: &ActorId) -> bool {
        match self.cache.owner() {
            Some(owner) if owner == *actor => true,
            owner => {
                debug!(actor = %actor, previous = ?owner, "Resetting vote cache");
                self.cache.reset(actor);
                false
            }
        }
    }

    /// Mirrors a vote into the cache unless the cache belongs to someone
    /// else by now.
    fn mirror(&self, actor: &ActorId, target: &TargetId, vote: CachedVote) {
        match self.cache.owner() {
            Some(owner) if owner != *actor => {
                debug!(actor = %actor, owner = %owner, "Vote cache changed hands, not mirroring");
                return;
            }
            Some(_) => {}
            None => self.cache.reset(actor),
        }
        self.cache.set(target, vote);
    }

    /// Returns the cached vote of `actor` on `target` without any I/O.
    pub fn cached(&self, actor: &ActorId, target: &TargetId) -> Option<VoteFlags> {
        if !self.claim_cache(actor) {
            return None;
        }
        self.cache.get(target).map(|vote| vote.flags)
    }

    /// Looks up the vote of `actor` on `target`, remote first.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(VoteLookup { source: Remote, .. }))` - The remote answered.
    ///   A missing record reads as neutral. The cache is overwritten.
    /// * `Ok(Some(VoteLookup { source: Cache, .. }))` - The remote failed and
    ///   a cached vote exists
    /// * `Ok(None)` - The remote failed and nothing is cached
    /// * `Err(ControllerError::KindMismatch)` - The stored record belongs to
    ///   a target of another kind under the same id
    #[instrument(skip_all, fields(actor = %actor, target = %target))]
    pub async fn get(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<Option<VoteLookup>, ControllerError> {
        let cached = self.cached(actor, target);

        match self.remote.get_vote(actor, target).await {
            Ok(Some(record)) if record.target_kind != kind => {
                warn!(stored = %record.target_kind, requested = %kind, "Vote record has another kind");
                Err(ControllerError::KindMismatch {
                    target: target.clone(),
                    tracked: record.target_kind,
                    requested: kind,
                })
            }
            Ok(Some(record)) => {
                if let Some(previous) = self.cache.get(target) {
                    if previous.last_updated < record.last_updated && previous.flags != record.flags {
                        debug!(
                            cached = ?previous.flags.state(),
                            remote = ?record.state(),
                            "Replacing stale cached vote"
                        );
                    }
                }
                self.mirror(actor, target, CachedVote::from(&record));
                Ok(Some(VoteLookup {
                    flags: record.flags,
                    source: Source::Remote,
                }))
            }
            Ok(None) => {
                let neutral = CachedVote {
                    flags: VoteFlags::neutral(),
                    last_updated: Utc::now(),
                };
                self.mirror(actor, target, neutral);
                Ok(Some(VoteLookup {
                    flags: VoteFlags::neutral(),
                    source: Source::Remote,
                }))
            }
            Err(e) => {
                warn!(error = %e, "Remote vote read failed, falling back to cache");
                Ok(cached.map(|flags| VoteLookup {
                    flags,
                    source: Source::Cache,
                }))
            }
        }
    }

    /// Writes the vote of `actor` on `target` to the remote store and, on
    /// success, to the cache. No retry.
    ///
    /// # Arguments
    ///
    /// * `liked`, `disliked` - The raw flag pair. Both set is rejected before
    ///   any I/O.
    #[instrument(skip_all, fields(actor = %actor, target = %target))]
    pub async fn upsert(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
        liked: bool,
        disliked: bool,
    ) -> Result<VoteRecord, ControllerError> {
        let flags = VoteFlags::new(liked, disliked)?;
        self.write(actor, target, kind, flags).await
    }

    /// Same as `upsert` for an already validated flag pair.
    pub async fn write(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
        flags: VoteFlags,
    ) -> Result<VoteRecord, ControllerError> {
        let record = self.remote.set_vote(actor, target, kind, flags).await?;
        self.mirror(actor, target, CachedVote::from(&record));
        debug!(state = ?record.state(), "Vote persisted");
        Ok(record)
    }
}
