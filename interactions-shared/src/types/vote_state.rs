use serde::{Deserialize, Serialize};

use crate::errors::TypeError;

/// Represents the settled vote of one actor on one target.
///
/// An in-flight mutation is not a `VoteState`; the controller tracks it
/// separately per (actor, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    /// No vote, or a vote that has been removed.
    #[default]
    Neutral,
    /// The actor likes the target.
    Liked,
    /// The actor dislikes the target.
    Disliked,
}

impl VoteState {
    pub fn flags(self) -> VoteFlags {
        VoteFlags::from(self)
    }
}

/// The input event applied to a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleKind {
    Like,
    Dislike,
}

/// The persisted `liked` / `disliked` pair.
///
/// Both flags can never be set at once: the only constructor that accepts raw
/// booleans validates the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawFlags", into = "RawFlags")]
pub struct VoteFlags {
    liked: bool,
    disliked: bool,
}

impl VoteFlags {
    /// Creates a flag pair from raw booleans.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteFlags)` - If at most one flag is set
    /// * `Err(TypeError::MutuallyExclusive)` - If both flags are set
    pub fn new(liked: bool, disliked: bool) -> Result<Self, TypeError> {
        if liked && disliked {
            return Err(TypeError::MutuallyExclusive);
        }
        Ok(Self { liked, disliked })
    }

    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn disliked(&self) -> bool {
        self.disliked
    }

    /// Both flags set cannot be constructed, so every pair maps to a state.
    pub fn state(&self) -> VoteState {
        match (self.liked, self.disliked) {
            (true, _) => VoteState::Liked,
            (false, true) => VoteState::Disliked,
            (false, false) => VoteState::Neutral,
        }
    }
}

impl From<VoteState> for VoteFlags {
    fn from(state: VoteState) -> Self {
        match state {
            VoteState::Neutral => Self { liked: false, disliked: false },
            VoteState::Liked => Self { liked: true, disliked: false },
            VoteState::Disliked => Self { liked: false, disliked: true },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawFlags {
    liked: bool,
    disliked: bool,
}

impl TryFrom<RawFlags> for VoteFlags {
    type Error = TypeError;

    fn try_from(raw: RawFlags) -> Result<Self, Self::Error> {
        VoteFlags::new(raw.liked, raw.disliked)
    }
}

impl From<VoteFlags> for RawFlags {
    fn from(flags: VoteFlags) -> Self {
        RawFlags {
            liked: flags.liked,
            disliked: flags.disliked,
        }
    }
}
