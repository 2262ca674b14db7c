//! Local vote caches.
//!
//! `MemoryVoteCache` lives for the process only. `FileVoteCache` persists the
//! mirror to a JSON file so a restarted session can render votes before the
//! remote answers.
mod file;
mod memory;

use std::collections::HashMap;

use interactions_shared::types::{ActorId, CachedVote, TargetId};
use serde::{Deserialize, Serialize};

pub use file::FileVoteCache;
pub use memory::MemoryVoteCache;

/// Cache contents: one actor's votes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entries {
    owner: Option<ActorId>,
    votes: HashMap<TargetId, CachedVote>,
}

impl Entries {
    fn reset(&mut self, owner: Option<&ActorId>) {
        self.owner = owner.cloned();
        self.votes.clear();
    }
}
