#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use interactions_controller::{ControllerConfig, InteractionController, Settled};
use interactions_repository::{Backend, CounterRepository, MemoryStore, MemoryVoteCache};
use interactions_shared::types::{
    ActorId, TargetCounters, TargetId, TargetKind, VoteRecord, VoteState,
};

pub fn actor() -> ActorId {
    ActorId::new("0xAAA").unwrap()
}

pub fn listing() -> TargetId {
    TargetId::new("listing-42").unwrap()
}

pub fn other_listing() -> TargetId {
    TargetId::new("listing-7").unwrap()
}

pub fn counters(target: &TargetId, like_count: i64, dislike_count: i64) -> TargetCounters {
    TargetCounters {
        like_count,
        dislike_count,
        ..TargetCounters::zero(target.clone(), TargetKind::Listing)
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub controller: InteractionController,
}

impl Harness {
    /// A controller with nobody connected.
    pub fn idle() -> Self {
        let store = Arc::new(MemoryStore::new());
        let backend = Backend::memory(store.clone());
        Self::over(store, &backend, ControllerConfig::default())
    }

    pub fn over(store: Arc<MemoryStore>, backend: &Backend, config: ControllerConfig) -> Self {
        let controller =
            InteractionController::new(backend, Arc::new(MemoryVoteCache::new()), config);
        Self { store, controller }
    }

    /// A controller over a fresh memory store with `0xAAA` connected, owning a
    /// profile and past the profile check.
    pub async fn ready() -> Self {
        Self::ready_with(ControllerConfig::default()).await
    }

    pub async fn ready_with(config: ControllerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let backend = Backend::memory(store.clone());
        Self::ready_over(store, &backend, config).await
    }

    pub async fn ready_over(
        store: Arc<MemoryStore>,
        backend: &Backend,
        config: ControllerConfig,
    ) -> Self {
        let harness = Self::over(store, backend, config);
        harness.store.add_profile(&actor());
        harness.controller.connect(actor());
        harness.controller.check_profile().await.unwrap();
        harness
    }

    /// Puts a target in the store and the controller with the given vote and
    /// counts.
    pub async fn seed(&self, target: &TargetId, state: VoteState, like_count: i64, dislike_count: i64) {
        let counts = counters(target, like_count, dislike_count);
        self.store.set_counts(&counts).await.unwrap();
        if state != VoteState::Neutral {
            self.store.put_vote(VoteRecord {
                actor_id: actor(),
                target_id: target.clone(),
                target_kind: TargetKind::Listing,
                flags: state.flags(),
                last_updated: Utc::now(),
            });
        }
        self.controller.track(counts, state).unwrap();
    }

    pub fn stored_state(&self, target: &TargetId) -> VoteState {
        self.store
            .vote_records()
            .into_iter()
            .find(|record| &record.target_id == target && record.actor_id == actor())
            .map(|record| record.state())
            .unwrap_or_default()
    }

    pub async fn stored_counts(&self, target: &TargetId) -> (i64, i64) {
        let counts = self.store.get_counts(target, TargetKind::Listing).await.unwrap();
        (counts.like_count, counts.dislike_count)
    }
}

pub fn committed(settled: Option<Settled>) -> interactions_controller::TargetView {
    match settled {
        Some(Settled::Committed(view)) => view,
        other => panic!("expected a committed toggle, got {other:?}"),
    }
}
