use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use interactions_shared::types::{
    ActorId, CountsDelta, TargetCounters, TargetId, TargetKind, VoteFlags, VoteRecord,
};

use crate::errors::RepositoryError;
use crate::interfaces::{CounterRepository, ProfileDirectory, VoteRepository};

/// Toggles that make the next calls of a `MemoryStore` fail as if the remote
/// were unreachable.
#[derive(Debug, Default)]
pub struct FailureSwitches {
    pub reads: AtomicBool,
    pub vote_writes: AtomicBool,
    pub counter_writes: AtomicBool,
}

/// In-memory storage backend for testing and development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    votes: RwLock<HashMap<(ActorId, TargetId), VoteRecord>>,
    counters: RwLock<HashMap<(TargetId, TargetKind), (i64, i64)>>,
    profiles: RwLock<HashSet<ActorId>>,
    failures: FailureSwitches,
    vote_writes: AtomicUsize,
    counter_writes: AtomicUsize,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile for `actor`, making it eligible to vote.
    pub fn add_profile(&self, actor: &ActorId) {
        write(&self.profiles).insert(actor.clone());
    }

    pub fn failures(&self) -> &FailureSwitches {
        &self.failures
    }

    pub fn fail_reads(&self, fail: bool) {
        self.failures.reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_vote_writes(&self, fail: bool) {
        self.failures.vote_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_counter_writes(&self, fail: bool) {
        self.failures.counter_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of vote writes attempted, successful or not.
    pub fn vote_write_count(&self) -> usize {
        self.vote_writes.load(Ordering::SeqCst)
    }

    /// Number of counter writes attempted, successful or not.
    pub fn counter_write_count(&self) -> usize {
        self.counter_writes.load(Ordering::SeqCst)
    }

    /// Every stored vote record, in no particular order.
    pub fn vote_records(&self) -> Vec<VoteRecord> {
        read(&self.votes).values().cloned().collect()
    }

    /// Overwrites a stored record without any check, to simulate a remote
    /// that changed behind the session's back.
    pub fn put_vote(&self, record: VoteRecord) {
        write(&self.votes).insert((record.actor_id.clone(), record.target_id.clone()), record);
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.failures.reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::unavailable("memory store reads disabled"));
        }
        Ok(())
    }

    fn check_counter_writes(&self) -> Result<(), RepositoryError> {
        self.counter_writes.fetch_add(1, Ordering::SeqCst);
        if self.failures.counter_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::unavailable("memory store counter writes disabled"));
        }
        Ok(())
    }

    fn counters_of(&self, target: &TargetId, kind: TargetKind) -> TargetCounters {
        let (like_count, dislike_count) = read(&self.counters)
            .get(&(target.clone(), kind))
            .copied()
            .unwrap_or((0, 0));
        TargetCounters {
            target_id: target.clone(),
            target_kind: kind,
            like_count,
            dislike_count,
        }
    }
}

#[async_trait::async_trait]
impl VoteRepository for MemoryStore {
    async fn get_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        self.check_reads()?;
        Ok(read(&self.votes).get(&(actor.clone(), target.clone())).cloned())
    }

    async fn set_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
        flags: VoteFlags,
    ) -> Result<VoteRecord, RepositoryError> {
        self.vote_writes.fetch_add(1, Ordering::SeqCst);
        if self.failures.vote_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::unavailable("memory store vote writes disabled"));
        }
        if !read(&self.profiles).contains(actor) {
            return Err(RepositoryError::NotEligible(actor.to_string()));
        }

        let mut votes = write(&self.votes);
        let key = (actor.clone(), target.clone());
        if let Some(stored) = votes.get(&key).filter(|stored| stored.target_kind != kind) {
            return Err(RepositoryError::KindMismatch {
                target: target.to_string(),
                stored: stored.target_kind,
                requested: kind,
            });
        }

        let record = VoteRecord {
            actor_id: actor.clone(),
            target_id: target.clone(),
            target_kind: kind,
            flags,
            last_updated: Utc::now(),
        };
        votes.insert(key, record.clone());
        Ok(record)
    }
}

#[async_trait::async_trait]
impl CounterRepository for MemoryStore {
    async fn get_counts(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError> {
        self.check_reads()?;
        Ok(self.counters_of(target, kind))
    }

    async fn set_counts(&self, counters: &TargetCounters) -> Result<(), RepositoryError> {
        self.check_counter_writes()?;
        write(&self.counters).insert(
            (counters.target_id.clone(), counters.target_kind),
            (counters.like_count.max(0), counters.dislike_count.max(0)),
        );
        Ok(())
    }

    async fn increment(
        &self,
        target: &TargetId,
        kind: TargetKind,
        delta: CountsDelta,
    ) -> Result<TargetCounters, RepositoryError> {
        self.check_counter_writes()?;
        let mut counters = write(&self.counters);
        let entry = counters.entry((target.clone(), kind)).or_insert((0, 0));
        entry.0 = (entry.0 + delta.likes).max(0);
        entry.1 = (entry.1 + delta.dislikes).max(0);
        Ok(TargetCounters {
            target_id: target.clone(),
            target_kind: kind,
            like_count: entry.0,
            dislike_count: entry.1,
        })
    }

    async fn compare_and_set(
        &self,
        expected: &TargetCounters,
        new: &TargetCounters,
    ) -> Result<bool, RepositoryError> {
        self.check_counter_writes()?;
        let mut counters = write(&self.counters);
        let key = (expected.target_id.clone(), expected.target_kind);
        let current = counters.get(&key).copied().unwrap_or((0, 0));
        if current != (expected.like_count, expected.dislike_count) {
            return Ok(false);
        }
        counters.insert(key, (new.like_count.max(0), new.dislike_count.max(0)));
        Ok(true)
    }

    async fn recount(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError> {
        self.check_counter_writes()?;
        let (like_count, dislike_count) = read(&self.votes)
            .values()
            .filter(|record| &record.target_id == target && record.target_kind == kind)
            .fold((0, 0), |(likes, dislikes), record| {
                (
                    likes + i64::from(record.liked()),
                    dislikes + i64::from(record.disliked()),
                )
            });
        write(&self.counters).insert((target.clone(), kind), (like_count, dislike_count));
        Ok(TargetCounters {
            target_id: target.clone(),
            target_kind: kind,
            like_count,
            dislike_count,
        })
    }
}

#[async_trait::async_trait]
impl ProfileDirectory for MemoryStore {
    async fn has_profile(&self, actor: &ActorId) -> Result<bool, RepositoryError> {
        self.check_reads()?;
        Ok(read(&self.profiles).contains(actor))
    }

    async fn create_profile(&self, actor: &ActorId) -> Result<(), RepositoryError> {
        self.add_profile(actor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interactions_shared::types::VoteState;

    fn actor() -> ActorId {
        ActorId::new("0xAAA").unwrap()
    }

    fn target() -> TargetId {
        TargetId::new("listing-42").unwrap()
    }

    #[tokio::test]
    async fn test_set_vote_requires_profile() {
        let store = MemoryStore::new();
        let result = store
            .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
            .await;
        assert!(matches!(result, Err(RepositoryError::NotEligible(_))));
        assert!(store.vote_records().is_empty());
    }

    #[tokio::test]
    async fn test_set_vote_upserts() {
        let store = MemoryStore::new();
        store.add_profile(&actor());

        store
            .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
            .await
            .unwrap();
        store
            .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Disliked.flags())
            .await
            .unwrap();

        let records = store.vote_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state(), VoteState::Disliked);
    }

    #[tokio::test]
    async fn test_set_vote_keeps_target_kind() {
        let store = MemoryStore::new();
        store.add_profile(&actor());
        store
            .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
            .await
            .unwrap();

        let result = store
            .set_vote(&actor(), &target(), TargetKind::Comment, VoteState::Liked.flags())
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::KindMismatch {
                stored: TargetKind::Listing,
                requested: TargetKind::Comment,
                ..
            })
        ));
        let records = store.vote_records();
        assert_eq!(records[0].target_kind, TargetKind::Listing);
        assert_eq!(records[0].state(), VoteState::Liked);
    }

    #[tokio::test]
    async fn test_increment_clamps_at_zero() {
        let store = MemoryStore::new();
        let counters = store
            .increment(&target(), TargetKind::Listing, CountsDelta::new(-1, 2))
            .await
            .unwrap();
        assert_eq!((counters.like_count, counters.dislike_count), (0, 2));
    }

    #[tokio::test]
    async fn test_compare_and_set_detects_conflict() {
        let store = MemoryStore::new();
        let zero = TargetCounters::zero(target(), TargetKind::Listing);
        let one = zero.apply(CountsDelta::new(1, 0));

        assert!(store.compare_and_set(&zero, &one).await.unwrap());
        // A second writer still holding the zero snapshot loses.
        assert!(!store.compare_and_set(&zero, &one).await.unwrap());
        assert_eq!(store.get_counts(&target(), TargetKind::Listing).await.unwrap(), one);
    }

    #[tokio::test]
    async fn test_recount_matches_records() {
        let store = MemoryStore::new();
        let other = ActorId::new("0xBBB").unwrap();
        store.add_profile(&actor());
        store.add_profile(&other);
        store
            .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
            .await
            .unwrap();
        store
            .set_vote(&other, &target(), TargetKind::Listing, VoteState::Disliked.flags())
            .await
            .unwrap();
        store
            .set_counts(&TargetCounters {
                like_count: 9,
                dislike_count: 9,
                ..TargetCounters::zero(target(), TargetKind::Listing)
            })
            .await
            .unwrap();

        let counters = store.recount(&target(), TargetKind::Listing).await.unwrap();
        assert_eq!((counters.like_count, counters.dislike_count), (1, 1));
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let store = MemoryStore::new();
        store.add_profile(&actor());
        store.fail_vote_writes(true);
        store.fail_reads(true);

        assert!(
            store
                .set_vote(&actor(), &target(), TargetKind::Listing, VoteState::Liked.flags())
                .await
                .is_err()
        );
        assert!(store.get_vote(&actor(), &target()).await.unwrap_err().is_transient());
        assert_eq!(store.vote_write_count(), 1);
    }
}
