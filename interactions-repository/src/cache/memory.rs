use std::sync::{PoisonError, RwLock};

use interactions_shared::types::{ActorId, CachedVote, TargetId};

use super::Entries;
use crate::interfaces::LocalVoteCache;

/// Process-local vote cache.
#[derive(Debug, Default)]
pub struct MemoryVoteCache {
    entries: RwLock<Entries>,
}

impl MemoryVoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalVoteCache for MemoryVoteCache {
    fn owner(&self) -> Option<ActorId> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).owner.clone()
    }

    fn get(&self, target: &TargetId) -> Option<CachedVote> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .votes
            .get(target)
            .copied()
    }

    fn set(&self, target: &TargetId, vote: CachedVote) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .votes
            .insert(target.clone(), vote);
    }

    fn reset(&self, owner: &ActorId) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).reset(Some(owner));
    }

    fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).reset(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use interactions_shared::types::VoteState;

    #[test]
    fn test_set_overwrites_and_clear_empties() {
        let cache = MemoryVoteCache::new();
        let target = TargetId::new("listing-42").unwrap();

        cache.set(&target, CachedVote { flags: VoteState::Liked.flags(), last_updated: Utc::now() });
        cache.set(&target, CachedVote { flags: VoteState::Neutral.flags(), last_updated: Utc::now() });
        assert_eq!(cache.get(&target).map(|v| v.flags.state()), Some(VoteState::Neutral));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&target).is_none());
    }

    #[test]
    fn test_reset_hands_over_an_empty_cache() {
        let cache = MemoryVoteCache::new();
        let target = TargetId::new("listing-42").unwrap();
        let first = ActorId::new("0xAAA").unwrap();
        let second = ActorId::new("0xBBB").unwrap();

        cache.reset(&first);
        cache.set(&target, CachedVote { flags: VoteState::Liked.flags(), last_updated: Utc::now() });
        assert_eq!(cache.owner(), Some(first));

        cache.reset(&second);
        assert_eq!(cache.owner(), Some(second));
        assert!(cache.is_empty());

        cache.clear();
        assert!(cache.owner().is_none());
    }
}
