//! The toggle table.
//!
//! `ToggleLike` moves `Neutral` and `Disliked` to `Liked` and `Liked` back to
//! `Neutral`; `ToggleDislike` is symmetric. Every step carries the counter
//! delta that keeps the target's counts in line with its vote records.
use interactions_shared::types::{CountsDelta, ToggleKind, VoteState};

/// The outcome of applying a toggle to a settled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: VoteState,
    pub delta: CountsDelta,
}

/// Returns the state a toggle leads to.
pub fn next_state(kind: ToggleKind, state: VoteState) -> VoteState {
    match (kind, state) {
        (ToggleKind::Like, VoteState::Liked) => VoteState::Neutral,
        (ToggleKind::Like, _) => VoteState::Liked,
        (ToggleKind::Dislike, VoteState::Disliked) => VoteState::Neutral,
        (ToggleKind::Dislike, _) => VoteState::Disliked,
    }
}

/// Computes the counter delta of moving a vote from `prev` to `next`.
///
/// # Arguments
///
/// * `prev` - The state before the change
/// * `next` - The state after the change
///
/// # Returns
///
/// The likes/dislikes delta. Equal states yield a zero delta.
pub fn delta_between(prev: VoteState, next: VoteState) -> CountsDelta {
    let (likes, dislikes) = match (prev, next) {
        (VoteState::Neutral, VoteState::Liked)    => (1, 0),
        (VoteState::Neutral, VoteState::Disliked) => (0, 1),
        (VoteState::Liked, VoteState::Neutral)    => (-1, 0),
        (VoteState::Liked, VoteState::Disliked)   => (-1, 1),
        (VoteState::Disliked, VoteState::Neutral) => (0, -1),
        (VoteState::Disliked, VoteState::Liked)   => (1, -1),
        (_, _) => (0, 0),
    };

    CountsDelta::new(likes, dislikes)
}

/// Applies a toggle to a settled state.
pub fn transition(kind: ToggleKind, state: VoteState) -> Transition {
    let next = next_state(kind, state);
    Transition {
        next,
        delta: delta_between(state, next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like_table() {
        assert_eq!(
            transition(ToggleKind::Like, VoteState::Neutral),
            Transition { next: VoteState::Liked, delta: CountsDelta::new(1, 0) }
        );
        assert_eq!(
            transition(ToggleKind::Like, VoteState::Liked),
            Transition { next: VoteState::Neutral, delta: CountsDelta::new(-1, 0) }
        );
        assert_eq!(
            transition(ToggleKind::Like, VoteState::Disliked),
            Transition { next: VoteState::Liked, delta: CountsDelta::new(1, -1) }
        );
    }

    #[test]
    fn test_toggle_dislike_table() {
        assert_eq!(
            transition(ToggleKind::Dislike, VoteState::Neutral),
            Transition { next: VoteState::Disliked, delta: CountsDelta::new(0, 1) }
        );
        assert_eq!(
            transition(ToggleKind::Dislike, VoteState::Disliked),
            Transition { next: VoteState::Neutral, delta: CountsDelta::new(0, -1) }
        );
        assert_eq!(
            transition(ToggleKind::Dislike, VoteState::Liked),
            Transition { next: VoteState::Disliked, delta: CountsDelta::new(-1, 1) }
        );
    }

    #[test]
    fn test_same_toggle_twice_is_identity() {
        for kind in [ToggleKind::Like, ToggleKind::Dislike] {
            for state in [VoteState::Neutral, VoteState::Liked, VoteState::Disliked] {
                let first = transition(kind, state);
                let second = transition(kind, first.next);
                if state == VoteState::Neutral || first.next == VoteState::Neutral {
                    assert_eq!(second.next, state);
                    assert!(CountsDelta::new(
                        first.delta.likes + second.delta.likes,
                        first.delta.dislikes + second.delta.dislikes,
                    )
                    .is_zero());
                }
            }
        }
    }

    #[test]
    fn test_delta_between_equal_states_is_zero() {
        for state in [VoteState::Neutral, VoteState::Liked, VoteState::Disliked] {
            assert!(delta_between(state, state).is_zero());
        }
    }
}
