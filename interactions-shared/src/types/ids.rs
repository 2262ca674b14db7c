use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TypeError;

/// Identifies the voting principal, typically a wallet address.
///
/// Addresses are case-insensitive, so the id is normalised to lower case on
/// construction. Two spellings of the same address always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Creates a new `ActorId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw actor identifier. Surrounding whitespace is trimmed.
    ///
    /// # Returns
    ///
    /// * `Ok(ActorId)` - The normalised identifier
    /// * `Err(TypeError::EmptyIdentifier)` - If the value is blank
    pub fn new(value: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyIdentifier("actor_id"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ActorId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Identifies the entity being voted on: a listing or a comment.
///
/// Target ids are opaque and kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    /// Creates a new `TargetId`, rejecting blank values.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyIdentifier("target_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TargetId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_is_case_insensitive() {
        let upper = ActorId::new("0xAAA").unwrap();
        let lower = ActorId::new("0xaaa").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xaaa");
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        assert_eq!(ActorId::new("  "), Err(TypeError::EmptyIdentifier("actor_id")));
        assert_eq!(TargetId::new(""), Err(TypeError::EmptyIdentifier("target_id")));
    }

    #[test]
    fn test_target_id_keeps_case() {
        let target = TargetId::new(" Listing-42 ").unwrap();
        assert_eq!(target.to_string(), "Listing-42");
    }

    #[test]
    fn test_ids_deserialize_through_validation() {
        let actor: ActorId = serde_json::from_str("\"0xBEEF\"").unwrap();
        assert_eq!(actor.as_str(), "0xbeef");
        assert!(serde_json::from_str::<TargetId>("\"\"").is_err());
    }
}
