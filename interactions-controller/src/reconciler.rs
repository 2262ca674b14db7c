//! Counter drift repair.
//!
//! Counters are maintained by deltas and drift from the vote records when a
//! counter write fails after its vote write succeeded. A recount recomputes
//! them from the records.
use std::sync::Arc;

use interactions_repository::CounterRepository;
use interactions_shared::types::{TargetCounters, TargetId, TargetKind};
use tracing::{info, warn};

use crate::errors::ControllerError;

/// Counters of a target before and after a recount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recount {
    pub before: TargetCounters,
    pub after: TargetCounters,
}

impl Recount {
    pub fn drifted(&self) -> bool {
        self.before != self.after
    }
}

pub struct Reconciler {
    counters: Arc<dyn CounterRepository>,
}

impl Reconciler {
    pub fn new(counters: Arc<dyn CounterRepository>) -> Self {
        Self { counters }
    }

    /// Recomputes the counters of a target from its vote records.
    pub async fn recount(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<Recount, ControllerError> {
        let before = self.counters.get_counts(target, kind).await?;
        let after = self.counters.recount(target, kind).await?;
        let recount = Recount { before, after };

        if recount.drifted() {
            warn!(
                target = %target,
                kind = %kind,
                before_likes = recount.before.like_count,
                before_dislikes = recount.before.dislike_count,
                after_likes = recount.after.like_count,
                after_dislikes = recount.after.dislike_count,
                "Counter drift repaired"
            );
        } else {
            info!(target = %target, kind = %kind, "Counters consistent");
        }
        Ok(recount)
    }
}
