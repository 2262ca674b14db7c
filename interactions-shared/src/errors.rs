//! Error types for the shared interaction types.
use thiserror::Error;

/// Represents errors raised while constructing or converting shared types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("Empty identifier: {0}")]
    EmptyIdentifier(&'static str),

    #[error("Invalid target kind: {0}")]
    InvalidTargetKind(i16),

    #[error("Vote cannot be both liked and disliked")]
    MutuallyExclusive,
}
