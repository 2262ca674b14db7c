mod ids;
mod target_counters;
mod target_kind;
mod vote_record;
mod vote_state;

pub use ids::{ActorId, TargetId};
pub use target_counters::{CountsDelta, TargetCounters};
pub use target_kind::TargetKind;
pub use vote_record::{CachedVote, VoteRecord};
pub use vote_state::{ToggleKind, VoteFlags, VoteState};

/// Composite key of a vote record: one row per actor and target.
pub type VoteKey = (ActorId, TargetId);
