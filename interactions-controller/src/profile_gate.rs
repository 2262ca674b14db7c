//! Profile Gate: an actor must have a profile before voting.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use interactions_repository::ProfileDirectory;
use interactions_shared::types::ActorId;
use tracing::{info, warn};

use crate::errors::ControllerError;

/// What the gate knows about an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No check has completed yet.
    Unknown,
    Checked { has_profile: bool },
}

/// Caches the profile check per actor for the lifetime of the gate.
pub struct ProfileGate {
    directory: Arc<dyn ProfileDirectory>,
    checked: Mutex<HashMap<ActorId, bool>>,
}

impl ProfileGate {
    pub fn new(directory: Arc<dyn ProfileDirectory>) -> Self {
        Self {
            directory,
            checked: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self, actor: &ActorId) -> GateState {
        match self.checked.lock().unwrap_or_else(PoisonError::into_inner).get(actor) {
            Some(&has_profile) => GateState::Checked { has_profile },
            None => GateState::Unknown,
        }
    }

    /// Asks the directory whether `actor` has a profile and remembers the
    /// answer. A cached answer is returned without a lookup.
    ///
    /// A failed lookup is not remembered, so the state stays `Unknown`.
    pub async fn has_profile(&self, actor: &ActorId) -> Result<bool, ControllerError> {
        if let GateState::Checked { has_profile } = self.state(actor) {
            return Ok(has_profile);
        }

        let has_profile = self.directory.has_profile(actor).await.map_err(|e| {
            warn!(actor = %actor, error = %e, "Profile lookup failed");
            e
        })?;
        info!(actor = %actor, has_profile, "Profile checked");
        self.checked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor.clone(), has_profile);
        Ok(has_profile)
    }

    /// Forgets the answer for `actor`, e.g. after they created a profile.
    pub fn invalidate(&self, actor: &ActorId) {
        self.checked.lock().unwrap_or_else(PoisonError::into_inner).remove(actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interactions_repository::MemoryStore;

    fn actor() -> ActorId {
        ActorId::new("0xAAA").unwrap()
    }

    #[tokio::test]
    async fn test_unknown_until_checked() {
        let directory = Arc::new(MemoryStore::new());
        directory.add_profile(&actor());
        let gate = ProfileGate::new(directory);

        assert_eq!(gate.state(&actor()), GateState::Unknown);
        assert!(gate.has_profile(&actor()).await.unwrap());
        assert_eq!(gate.state(&actor()), GateState::Checked { has_profile: true });
    }

    #[tokio::test]
    async fn test_failed_lookup_stays_unknown() {
        let directory = Arc::new(MemoryStore::new());
        directory.fail_reads(true);
        let gate = ProfileGate::new(directory.clone());

        assert!(gate.has_profile(&actor()).await.is_err());
        assert_eq!(gate.state(&actor()), GateState::Unknown);

        directory.fail_reads(false);
        assert!(!gate.has_profile(&actor()).await.unwrap());
        assert_eq!(gate.state(&actor()), GateState::Checked { has_profile: false });
    }

    #[tokio::test]
    async fn test_invalidate_rechecks() {
        let directory = Arc::new(MemoryStore::new());
        let gate = ProfileGate::new(directory.clone());
        assert!(!gate.has_profile(&actor()).await.unwrap());

        directory.add_profile(&actor());
        assert!(!gate.has_profile(&actor()).await.unwrap());

        gate.invalidate(&actor());
        assert!(gate.has_profile(&actor()).await.unwrap());
    }
}
