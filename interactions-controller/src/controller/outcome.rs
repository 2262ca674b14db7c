use tokio::task::JoinHandle;
use tracing::error;

use super::view::TargetView;
use crate::errors::ControllerError;

/// How the persistence of a toggle ended.
#[derive(Debug)]
pub enum Settled {
    /// Both stores accepted the change.
    Committed(TargetView),
    /// A write failed and the view was reverted to its pre-toggle values.
    RolledBack {
        view: TargetView,
        error: ControllerError,
    },
    /// The controller shut down before the result could be applied.
    Abandoned,
}

/// Handle on the background persistence of an applied toggle.
#[derive(Debug)]
pub struct Settlement {
    handle: JoinHandle<Settled>,
}

impl Settlement {
    pub(crate) fn new(handle: JoinHandle<Settled>) -> Self {
        Self { handle }
    }

    /// Waits for the persistence to finish.
    pub async fn settled(self) -> Settled {
        match self.handle.await {
            Ok(settled) => settled,
            Err(e) => {
                error!(error = %e, "Persistence task did not complete");
                Settled::Abandoned
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// The immediate result of a toggle.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The optimistic update is visible in `view`; `settlement` resolves once
    /// it has been persisted or rolled back.
    Applied {
        view: TargetView,
        settlement: Settlement,
    },
    /// A toggle on the same target is still in flight. Nothing changed.
    Suppressed { view: TargetView },
}

impl ToggleOutcome {
    pub fn view(&self) -> &TargetView {
        match self {
            Self::Applied { view, .. } | Self::Suppressed { view } => view,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }

    /// Waits for the persistence of an applied toggle. A suppressed toggle
    /// has nothing to wait for and returns `None`.
    pub async fn settled(self) -> Option<Settled> {
        match self {
            Self::Applied { settlement, .. } => Some(settlement.settled().await),
            Self::Suppressed { .. } => None,
        }
    }
}
