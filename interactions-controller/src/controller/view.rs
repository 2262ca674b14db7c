use interactions_shared::types::{TargetCounters, TargetId, TargetKind, VoteState};

/// What a UI component renders for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    pub target_id: TargetId,
    pub target_kind: TargetKind,
    pub liked: bool,
    pub disliked: bool,
    pub like_count: i64,
    pub dislike_count: i64,
    /// A toggle of the connected actor on this target is being persisted.
    pub busy: bool,
}

impl TargetView {
    pub(crate) fn new(state: VoteState, counters: &TargetCounters, busy: bool) -> Self {
        let flags = state.flags();
        Self {
            target_id: counters.target_id.clone(),
            target_kind: counters.target_kind,
            liked: flags.liked(),
            disliked: flags.disliked(),
            like_count: counters.like_count,
            dislike_count: counters.dislike_count,
            busy,
        }
    }

    pub fn state(&self) -> VoteState {
        match (self.liked, self.disliked) {
            (true, _) => VoteState::Liked,
            (false, true) => VoteState::Disliked,
            (false, false) => VoteState::Neutral,
        }
    }

    pub fn counts(&self) -> (i64, i64) {
        (self.like_count, self.dislike_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A toggle was refused before anything changed.
    Rejected,
    /// A toggle could not be persisted and was reverted.
    WriteFailed,
}

/// A user-facing message about a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub target: Option<TargetId>,
    pub message: String,
}
