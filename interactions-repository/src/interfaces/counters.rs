//! This module defines the `CounterRepository` trait for per-target like and
//! dislike tallies.
use interactions_shared::types::{CountsDelta, TargetCounters, TargetId, TargetKind};

use crate::errors::RepositoryError;

/// A trait that defines the interface to the target counter store.
///
/// Besides plain reads and writes it exposes the two concurrency-safe update
/// primitives: a server-side atomic increment and a compare-and-set.
#[async_trait::async_trait]
pub trait CounterRepository: Send + Sync {
    /// Reads the counters of a target. A target without a row reads as zero.
    async fn get_counts(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError>;

    /// Overwrites the counters of a target.
    async fn set_counts(&self, counters: &TargetCounters) -> Result<(), RepositoryError>;

    /// Atomically adds `delta` to the counters of a target, clamping at zero.
    ///
    /// # Returns
    ///
    /// The counters after the increment.
    async fn increment(
        &self,
        target: &TargetId,
        kind: TargetKind,
        delta: CountsDelta,
    ) -> Result<TargetCounters, RepositoryError>;

    /// Replaces the counters with `new` only if they still equal `expected`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The write was applied
    /// * `Ok(false)` - Another writer changed the counters first
    async fn compare_and_set(
        &self,
        expected: &TargetCounters,
        new: &TargetCounters,
    ) -> Result<bool, RepositoryError>;

    /// Recomputes the counters of a target from its vote records and stores
    /// the result.
    async fn recount(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError>;
}
