use serde::{Deserialize, Serialize};

use crate::types::{TargetId, TargetKind};

/// Represents the aggregated like and dislike counts of a target.
///
/// Counts are maintained by applying deltas and can drift from the vote
/// records under partial failure; a recount restores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCounters {
    pub target_id: TargetId,
    pub target_kind: TargetKind,
    pub like_count: i64,
    pub dislike_count: i64,
}

impl TargetCounters {
    /// Counters of a target nobody has voted on yet.
    pub fn zero(target_id: TargetId, target_kind: TargetKind) -> Self {
        Self {
            target_id,
            target_kind,
            like_count: 0,
            dislike_count: 0,
        }
    }

    /// Returns the counters with `delta` applied, saturating at zero.
    pub fn apply(&self, delta: CountsDelta) -> Self {
        Self {
            like_count: (self.like_count + delta.likes).max(0),
            dislike_count: (self.dislike_count + delta.dislikes).max(0),
            ..self.clone()
        }
    }
}

/// A change to apply to a target's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CountsDelta {
    pub likes: i64,
    pub dislikes: i64,
}

impl CountsDelta {
    pub fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    pub fn is_zero(&self) -> bool {
        self.likes == 0 && self.dislikes == 0
    }

    /// The delta that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            likes: -self.likes,
            dislikes: -self.dislikes,
        }
    }
}
