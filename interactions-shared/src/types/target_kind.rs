use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TypeError;

/// Represents the kind of entity a vote targets.
///
/// The kind selects the counter row a vote contributes to. A target id names
/// one entity, so an id keeps the kind it was first voted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A wanted-listing entry.
    Listing,
    /// A comment attached to a listing.
    Comment,
}

impl TargetKind {
    /// Storage representation used by the `smallint` columns.
    pub fn as_i16(self) -> i16 {
        match self {
            TargetKind::Listing => 0,
            TargetKind::Comment => 1,
        }
    }
}

impl TryFrom<i16> for TargetKind {
    type Error = TypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TargetKind::Listing),
            1 => Ok(TargetKind::Comment),
            other => Err(TypeError::InvalidTargetKind(other)),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Listing => f.write_str("listing"),
            TargetKind::Comment => f.write_str("comment"),
        }
    }
}
