use interactions_shared::types::{ActorId, CachedVote, TargetId};

/// Per-session key-value mirror of one actor's votes, keyed by target.
///
/// The cache is best effort: it never fails and has no expiry. It is a fast
/// read path and a fallback for an unreachable remote, never a source of
/// truth. The owning actor is stored with the entries so a cache that
/// outlives the process is never read on behalf of someone else.
pub trait LocalVoteCache: Send + Sync {
    /// The actor whose votes the entries are, if any.
    fn owner(&self) -> Option<ActorId>;

    fn get(&self, target: &TargetId) -> Option<CachedVote>;

    fn set(&self, target: &TargetId, vote: CachedVote);

    /// Drops every entry and hands the cache to `owner`.
    fn reset(&self, owner: &ActorId);

    /// Drops every entry and the owner.
    fn clear(&self);
}
