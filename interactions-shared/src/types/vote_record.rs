use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActorId, TargetId, TargetKind, VoteFlags, VoteState};

/// Represents an actor's vote on a target.
///
/// One record exists per (actor, target) pair. Records are never deleted: a
/// removed vote is stored with both flags cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub actor_id: ActorId,
    pub target_id: TargetId,
    pub target_kind: TargetKind,
    pub flags: VoteFlags,
    pub last_updated: DateTime<Utc>,
}

impl VoteRecord {
    pub fn state(&self) -> VoteState {
        self.flags.state()
    }

    pub fn liked(&self) -> bool {
        self.flags.liked()
    }

    pub fn disliked(&self) -> bool {
        self.flags.disliked()
    }
}

/// A vote as mirrored into the local cache.
///
/// `last_updated` carries the remote record's timestamp so a stale cache entry
/// can be told apart from a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedVote {
    pub flags: VoteFlags,
    pub last_updated: DateTime<Utc>,
}

impl From<&VoteRecord> for CachedVote {
    fn from(record: &VoteRecord) -> Self {
        Self {
            flags: record.flags,
            last_updated: record.last_updated,
        }
    }
}
