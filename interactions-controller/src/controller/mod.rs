//! The Interaction Controller.
//!
//! One controller serves every target kind. It holds the connected actor,
//! the view of every tracked target, and the set of (actor, target) pairs
//! whose toggle is being persisted. A toggle is applied to the view
//! synchronously and persisted in a spawned task: vote record first, then
//! counters. Any failure reverts the view to its pre-toggle values.
//!
//! The session lives behind a `std::sync::Mutex` that is never held across
//! an `.await`.
mod outcome;
mod view;

pub use outcome::{Settled, Settlement, ToggleOutcome};
pub use view::{Notice, NoticeKind, TargetView};

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use interactions_repository::{Backend, LocalVoteCache};
use interactions_shared::types::{
    ActorId, TargetCounters, TargetId, TargetKind, ToggleKind, VoteKey, VoteState,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::config::ControllerConfig;
use crate::counter_store::CounterStore;
use crate::errors::{ControllerError, ToggleError};
use crate::profile_gate::{GateState, ProfileGate};
use crate::reconciler::{Reconciler, Recount};
use crate::transition::{Transition, transition};
use crate::vote_store::VoteRecordStore;

struct Tracked {
    state: VoteState,
    counters: TargetCounters,
    sender: watch::Sender<TargetView>,
}

impl Tracked {
    fn new(state: VoteState, counters: TargetCounters) -> Self {
        let (sender, _) = watch::channel(TargetView::new(state, &counters, false));
        Self {
            state,
            counters,
            sender,
        }
    }

    fn kind(&self) -> TargetKind {
        self.counters.target_kind
    }

    /// Sends the current view to subscribers and returns it.
    fn publish(&self, busy: bool) -> TargetView {
        let view = TargetView::new(self.state, &self.counters, busy);
        self.sender.send_replace(view.clone());
        view
    }
}

#[derive(Default)]
struct Session {
    actor: Option<ActorId>,
    targets: HashMap<TargetId, Tracked>,
    busy: HashSet<VoteKey>,
    drifted: HashSet<(TargetId, TargetKind)>,
}

impl Session {
    fn is_busy(&self, target: &TargetId) -> bool {
        self.actor
            .as_ref()
            .is_some_and(|actor| self.busy.contains(&(actor.clone(), target.clone())))
    }

    fn view(&self, target: &TargetId) -> Option<TargetView> {
        let tracked = self.targets.get(target)?;
        Some(TargetView::new(tracked.state, &tracked.counters, self.is_busy(target)))
    }

    /// Refuses to track `target` under `kind` when it is tracked under
    /// another kind.
    fn check_kind(&self, target: &TargetId, kind: TargetKind) -> Result<(), ControllerError> {
        match self.targets.get(target) {
            Some(tracked) if tracked.kind() != kind => Err(ControllerError::KindMismatch {
                target: target.clone(),
                tracked: tracked.kind(),
                requested: kind,
            }),
            _ => Ok(()),
        }
    }

    /// Clears every tracked vote, keeping the counts.
    fn reset_votes(&mut self) {
        let actor = self.actor.clone();
        for (target, tracked) in self.targets.iter_mut() {
            tracked.state = VoteState::Neutral;
            let busy = actor
                .as_ref()
                .is_some_and(|actor| self.busy.contains(&(actor.clone(), target.clone())));
            tracked.publish(busy);
        }
    }
}

struct Inner {
    votes: VoteRecordStore,
    counters: CounterStore,
    gate: ProfileGate,
    session: Mutex<Session>,
    notices: broadcast::Sender<Notice>,
    alive: AtomicBool,
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn notify(&self, kind: NoticeKind, target: Option<&TargetId>, message: impl Into<String>) {
        // Nobody listening is fine.
        let _ = self.notices.send(Notice {
            kind,
            target: target.cloned(),
            message: message.into(),
        });
    }
}

/// Clears the liveness flag once the last controller handle is dropped.
struct Liveness(Arc<Inner>);

impl Drop for Liveness {
    fn drop(&mut self) {
        self.0.alive.store(false, Ordering::SeqCst);
    }
}

/// Single-flight like/dislike controller.
///
/// Handles are cheap to clone and share one session. Persistence tasks keep
/// running after the last handle is dropped, but no longer touch the views.
#[derive(Clone)]
pub struct InteractionController {
    inner: Arc<Inner>,
    _liveness: Arc<Liveness>,
}

impl InteractionController {
    /// Creates a controller over `backend`, mirroring votes into `cache`.
    pub fn new(backend: &Backend, cache: Arc<dyn LocalVoteCache>, config: ControllerConfig) -> Self {
        let (notices, _) = broadcast::channel(config.notice_capacity.max(1));
        let inner = Arc::new(Inner {
            votes: VoteRecordStore::new(backend.votes.clone(), cache),
            counters: CounterStore::new(backend.counters.clone(), config.counter_mode),
            gate: ProfileGate::new(backend.profiles.clone()),
            session: Mutex::new(Session::default()),
            notices,
            alive: AtomicBool::new(true),
        });

        Self {
            _liveness: Arc::new(Liveness(inner.clone())),
            inner,
        }
    }

    /// Makes `actor` the acting principal.
    ///
    /// Switching to another actor clears every tracked vote and resets the
    /// profile check for the new actor; callers reload the targets they show.
    pub fn connect(&self, actor: ActorId) {
        let mut session = self.inner.session();
        if session.actor.as_ref() == Some(&actor) {
            return;
        }

        info!(actor = %actor, "Actor connected");
        self.inner.gate.invalidate(&actor);
        session.actor = Some(actor);
        session.reset_votes();
    }

    pub fn disconnect(&self) {
        let mut session = self.inner.session();
        if let Some(actor) = session.actor.take() {
            info!(actor = %actor, "Actor disconnected");
            session.reset_votes();
        }
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.inner.session().actor.clone()
    }

    /// The profile gate state of the connected actor. `Unknown` when nobody
    /// is connected.
    pub fn gate_state(&self) -> GateState {
        match self.actor() {
            Some(actor) => self.inner.gate.state(&actor),
            None => GateState::Unknown,
        }
    }

    /// Runs the profile check for the connected actor.
    ///
    /// # Returns
    ///
    /// * `Ok(GateState::Checked { .. })` - The check completed
    /// * `Ok(GateState::Unknown)` - Nobody is connected
    /// * `Err(ControllerError)` - The lookup failed; the state stays `Unknown`
    pub async fn check_profile(&self) -> Result<GateState, ControllerError> {
        let Some(actor) = self.actor() else {
            return Ok(GateState::Unknown);
        };
        self.inner.gate.has_profile(&actor).await?;
        Ok(self.inner.gate.state(&actor))
    }

    /// Starts tracking a target with caller-supplied counts and vote.
    ///
    /// An already tracked target is overwritten unless a toggle on it is in
    /// flight. A target id names one entity, so tracking it again under
    /// another kind is refused.
    pub fn track(
        &self,
        counters: TargetCounters,
        state: VoteState,
    ) -> Result<TargetView, ControllerError> {
        let mut guard = self.inner.session();
        let session = &mut *guard;
        let target = counters.target_id.clone();
        session.check_kind(&target, counters.target_kind)?;
        let busy = session.is_busy(&target);

        let tracked = session
            .targets
            .entry(target)
            .or_insert_with(|| Tracked::new(state, counters.clone()));
        if !busy {
            tracked.state = state;
            tracked.counters = counters;
        }
        Ok(tracked.publish(busy))
    }

    /// Loads a target from the stores.
    ///
    /// The cached vote is published right away; the remote vote and counts
    /// replace it once they arrive. A failed remote vote read keeps the
    /// cached vote. A failed counter read is returned as an error after the
    /// vote has been published.
    ///
    /// Loading a tracked target under another kind, or a target whose stored
    /// vote has another kind, fails with `ControllerError::KindMismatch`.
    pub async fn load(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetView, ControllerError> {
        let (actor, inserted) = {
            let mut guard = self.inner.session();
            let session = &mut *guard;
            session.check_kind(target, kind)?;
            let actor = session.actor.clone();
            let cached = actor
                .as_ref()
                .and_then(|actor| self.inner.votes.cached(actor, target));
            let busy = session.is_busy(target);
            let inserted = !session.targets.contains_key(target);

            let tracked = session.targets.entry(target.clone()).or_insert_with(|| {
                Tracked::new(VoteState::Neutral, TargetCounters::zero(target.clone(), kind))
            });
            if let (Some(flags), false) = (cached, busy) {
                tracked.state = flags.state();
            }
            tracked.publish(busy);
            (actor, inserted)
        };

        let vote = async {
            match &actor {
                Some(actor) => self.inner.votes.get(actor, target, kind).await,
                None => Ok(None),
            }
        };
        let (lookup, counters) = tokio::join!(vote, self.inner.counters.get(target, kind));

        if !self.inner.is_alive() {
            return Err(ControllerError::ShutDown);
        }

        let mut guard = self.inner.session();
        let session = &mut *guard;
        let lookup = match lookup {
            Ok(lookup) => lookup,
            Err(e) => {
                let ours = session.targets.get(target).is_some_and(|tracked| tracked.kind() == kind);
                if inserted && ours && !session.is_busy(target) {
                    session.targets.remove(target);
                }
                return Err(e);
            }
        };
        let busy = session.is_busy(target);
        let same_actor = session.actor == actor;

        let view = match session.targets.get_mut(target) {
            Some(tracked) if tracked.kind() == kind => {
                if !busy {
                    if let (Some(lookup), true) = (&lookup, same_actor) {
                        tracked.state = lookup.flags.state();
                    }
                    if let Ok(counters) = &counters {
                        tracked.counters = counters.clone();
                    }
                }
                tracked.publish(busy)
            }
            // Forgotten or re-tracked under another kind while loading.
            _ => {
                let state = lookup.map(|lookup| lookup.flags.state()).unwrap_or_default();
                let counters = match &counters {
                    Ok(counters) => counters.clone(),
                    Err(_) => TargetCounters::zero(target.clone(), kind),
                };
                TargetView::new(state, &counters, busy)
            }
        };
        drop(guard);

        match counters {
            Ok(_) => Ok(view),
            Err(e) => {
                warn!(target = %target, error = %e, "Failed to load counters");
                Err(e)
            }
        }
    }

    /// Stops tracking a target. Subscribers see their channel close.
    pub fn forget(&self, target: &TargetId) {
        self.inner.session().targets.remove(target);
    }

    pub fn view(&self, target: &TargetId) -> Option<TargetView> {
        self.inner.session().view(target)
    }

    /// Observes the view of a tracked target.
    pub fn subscribe(&self, target: &TargetId) -> Option<watch::Receiver<TargetView>> {
        self.inner
            .session()
            .targets
            .get(target)
            .map(|tracked| tracked.sender.subscribe())
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    pub fn toggle_like(&self, target: &TargetId) -> Result<ToggleOutcome, ToggleError> {
        self.toggle(ToggleKind::Like, target)
    }

    pub fn toggle_dislike(&self, target: &TargetId) -> Result<ToggleOutcome, ToggleError> {
        self.toggle(ToggleKind::Dislike, target)
    }

    /// Applies a toggle to the view of `target` and persists it in the
    /// background.
    ///
    /// # Returns
    ///
    /// * `Ok(ToggleOutcome::Applied)` - The optimistic view, plus a handle on
    ///   the persistence
    /// * `Ok(ToggleOutcome::Suppressed)` - A toggle on the same target is in
    ///   flight; nothing changed and nothing is written
    /// * `Err(ToggleError)` - A precondition failed; nothing changed and a
    ///   `NoticeKind::Rejected` notice is sent
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn toggle(&self, kind: ToggleKind, target: &TargetId) -> Result<ToggleOutcome, ToggleError> {
        let (job, view) = match self.begin(kind, target) {
            Ok(Begun::Applied(job, view)) => (job, view),
            Ok(Begun::Suppressed(view)) => return Ok(ToggleOutcome::Suppressed { view }),
            Err(e) => {
                debug!(target = %target, reason = %e, "Toggle rejected");
                self.inner.notify(NoticeKind::Rejected, Some(target), e.to_string());
                return Err(e);
            }
        };

        let handle = tokio::spawn(job.run(self.inner.clone()));
        Ok(ToggleOutcome::Applied {
            view,
            settlement: Settlement::new(handle),
        })
    }

    fn begin(&self, kind: ToggleKind, target: &TargetId) -> Result<Begun, ToggleError> {
        let mut guard = self.inner.session();
        let session = &mut *guard;

        let actor = session.actor.clone().ok_or(ToggleError::NotConnected)?;
        match self.inner.gate.state(&actor) {
            GateState::Unknown => return Err(ToggleError::ProfilePending),
            GateState::Checked { has_profile: false } => return Err(ToggleError::ProfileRequired),
            GateState::Checked { has_profile: true } => {}
        }

        let key = (actor, target.clone());
        let busy = session.busy.contains(&key);
        let tracked = session
            .targets
            .get_mut(target)
            .ok_or_else(|| ToggleError::UntrackedTarget(target.clone()))?;

        if busy {
            debug!(actor = %key.0, target = %target, "Toggle suppressed while in flight");
            let view = TargetView::new(tracked.state, &tracked.counters, true);
            return Ok(Begun::Suppressed(view));
        }

        let previous = Snapshot {
            state: tracked.state,
            counters: tracked.counters.clone(),
        };
        let step = transition(kind, tracked.state);
        tracked.state = step.next;
        tracked.counters = tracked.counters.apply(step.delta);
        let view = tracked.publish(true);
        session.busy.insert(key.clone());

        info!(
            actor = %key.0,
            target = %target,
            from = ?previous.state,
            to = ?step.next,
            "Toggle applied"
        );
        let (actor, target) = key;
        let job = Persist {
            actor,
            target,
            kind: previous.counters.target_kind,
            previous,
            step,
        };
        Ok(Begun::Applied(job, view))
    }

    /// Targets whose counters may disagree with their vote records because a
    /// counter write and the vote restore both failed.
    pub fn drifted(&self) -> Vec<(TargetId, TargetKind)> {
        self.inner.session().drifted.iter().cloned().collect()
    }

    /// Recounts every drifted target and refreshes the tracked counts.
    ///
    /// Targets whose recount fails stay drifted. After a shutdown the views
    /// and the drifted set are left alone and the remaining targets skipped.
    pub async fn reconcile(&self, reconciler: &Reconciler) -> Vec<Result<Recount, ControllerError>> {
        let mut results = Vec::new();
        for (target, kind) in self.drifted() {
            let result = reconciler.recount(&target, kind).await;
            if !self.inner.is_alive() {
                results.push(result);
                break;
            }
            if let Ok(recount) = &result {
                let mut guard = self.inner.session();
                let session = &mut *guard;
                session.drifted.remove(&(target.clone(), kind));
                let busy = session.is_busy(&target);
                if let Some(tracked) = session.targets.get_mut(&target) {
                    if tracked.kind() == kind && !busy {
                        tracked.counters = recount.after.clone();
                        tracked.publish(busy);
                    }
                }
            }
            results.push(result);
        }
        results
    }

    /// Stops applying persistence results to the views. Writes already in
    /// flight still complete.
    pub fn shutdown(&self) {
        info!("Interaction controller shutting down");
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }
}

enum Begun {
    Applied(Persist, TargetView),
    Suppressed(TargetView),
}

struct Snapshot {
    state: VoteState,
    counters: TargetCounters,
}

/// The background half of a toggle.
struct Persist {
    actor: ActorId,
    target: TargetId,
    kind: TargetKind,
    previous: Snapshot,
    step: Transition,
}

impl Persist {
    async fn run(self, inner: Arc<Inner>) -> Settled {
        let outcome = self.write(&inner).await;

        if !inner.is_alive() {
            debug!(actor = %self.actor, target = %self.target, "Controller gone, discarding result");
            return Settled::Abandoned;
        }

        let mut guard = inner.session();
        let session = &mut *guard;
        session.busy.remove(&(self.actor.clone(), self.target.clone()));
        let current = session.actor.as_ref() == Some(&self.actor);
        let busy = session.is_busy(&self.target);
        let tracked = session
            .targets
            .get_mut(&self.target)
            .filter(|tracked| tracked.kind() == self.kind);

        match outcome {
            Ok(counters) => {
                let view = match tracked {
                    Some(tracked) => {
                        tracked.counters = counters;
                        tracked.publish(busy)
                    }
                    None => TargetView::new(self.step.next, &counters, false),
                };
                drop(guard);
                info!(actor = %self.actor, target = %self.target, state = ?self.step.next, "Toggle committed");
                Settled::Committed(view)
            }
            Err(error) => {
                let view = match tracked {
                    Some(tracked) => {
                        if current {
                            tracked.state = self.previous.state;
                        }
                        tracked.counters = self.previous.counters.clone();
                        tracked.publish(busy)
                    }
                    None => TargetView::new(self.previous.state, &self.previous.counters, false),
                };
                drop(guard);
                warn!(actor = %self.actor, target = %self.target, error = %error, "Toggle rolled back");
                inner.notify(
                    NoticeKind::WriteFailed,
                    Some(&self.target),
                    format!("Your vote could not be saved: {error}"),
                );
                Settled::RolledBack { view, error }
            }
        }
    }

    /// Writes the vote record, then the counters.
    async fn write(&self, inner: &Inner) -> Result<TargetCounters, ControllerError> {
        inner
            .votes
            .write(&self.actor, &self.target, self.kind, self.step.next.flags())
            .await?;

        match inner.counters.apply_delta(&self.target, self.kind, self.step.delta).await {
            Ok(counters) => Ok(counters),
            Err(error) => {
                self.restore_vote(inner).await;
                Err(error)
            }
        }
    }

    /// Puts the previous vote back after the counters refused the delta.
    async fn restore_vote(&self, inner: &Inner) {
        warn!(
            actor = %self.actor,
            target = %self.target,
            "Counter update failed after the vote was saved, restoring previous vote"
        );
        let restored = inner
            .votes
            .write(&self.actor, &self.target, self.kind, self.previous.state.flags())
            .await;

        if let Err(e) = restored {
            error!(
                actor = %self.actor,
                target = %self.target,
                error = %e,
                "Could not restore vote, counters have drifted"
            );
            inner.session().drifted.insert((self.target.clone(), self.kind));
        }
    }
}
