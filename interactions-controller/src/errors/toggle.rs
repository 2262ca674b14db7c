//! Precondition failures of a toggle.
use interactions_shared::types::TargetId;
use thiserror::Error;

/// Why a toggle was rejected before any state changed.
///
/// The display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("Connect your wallet to vote")]
    NotConnected,

    #[error("Checking your profile, please wait")]
    ProfilePending,

    #[error("Create a profile to vote")]
    ProfileRequired,

    #[error("Target {0} is not loaded")]
    UntrackedTarget(TargetId),
}
