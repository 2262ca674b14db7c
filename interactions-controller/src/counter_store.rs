//! Target Counter Store adapter.
use std::sync::Arc;

use interactions_repository::CounterRepository;
use interactions_shared::types::{CountsDelta, TargetCounters, TargetId, TargetKind};
use tracing::{debug, instrument, warn};

use crate::config::CounterWriteMode;
use crate::errors::ControllerError;

/// Applies counter deltas without losing concurrent updates.
pub struct CounterStore {
    repository: Arc<dyn CounterRepository>,
    mode: CounterWriteMode,
}

impl CounterStore {
    pub fn new(repository: Arc<dyn CounterRepository>, mode: CounterWriteMode) -> Self {
        Self { repository, mode }
    }

    pub fn mode(&self) -> CounterWriteMode {
        self.mode
    }

    /// Reads the counters of a target. A target nobody voted on reads as zero.
    pub async fn get(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, ControllerError> {
        Ok(self.repository.get_counts(target, kind).await?)
    }

    /// Adds `delta` to the counters of a target.
    ///
    /// # Arguments
    ///
    /// * `target` - The voted entity
    /// * `kind` - Its kind, selecting the counter row
    /// * `delta` - The change to apply. A zero delta is a no-op read.
    ///
    /// # Returns
    ///
    /// * `Ok(TargetCounters)` - The counters after the update
    /// * `Err(ControllerError::CounterContention)` - Compare-and-set lost every attempt
    /// * `Err(ControllerError::Repository)` - The store failed
    #[instrument(skip_all, fields(target = %target, kind = %kind, delta = ?delta))]
    pub async fn apply_delta(
        &self,
        target: &TargetId,
        kind: TargetKind,
        delta: CountsDelta,
    ) -> Result<TargetCounters, ControllerError> {
        if delta.is_zero() {
            return self.get(target, kind).await;
        }

        match self.mode {
            CounterWriteMode::Atomic => Ok(self.repository.increment(target, kind, delta).await?),
            CounterWriteMode::CompareAndSwap { max_attempts } => {
                self.compare_and_swap(target, kind, delta, max_attempts).await
            }
        }
    }

    async fn compare_and_swap(
        &self,
        target: &TargetId,
        kind: TargetKind,
        delta: CountsDelta,
        max_attempts: u32,
    ) -> Result<TargetCounters, ControllerError> {
        let attempts = max_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.repository.get_counts(target, kind).await?;
            let next = current.apply(delta);
            if self.repository.compare_and_set(&current, &next).await? {
                debug!(attempt, "Counters updated");
                return Ok(next);
            }
            debug!(attempt, "Counter write conflicted, retrying");
        }

        warn!(attempts, "Giving up on counter update");
        Err(ControllerError::CounterContention {
            target: target.to_string(),
            attempts,
        })
    }
}
