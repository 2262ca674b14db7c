//! # Interactions Controller
//! The vote consistency core: a single controller, parametrised by target
//! kind, that applies like/dislike toggles optimistically, persists them to
//! the vote and counter stores, and rolls back on failure.
//!
//! ## Components
//!
//! - `transition`: The pure toggle table and counter deltas
//! - `vote_store`: Remote vote records mirrored into a local cache
//! - `counter_store`: Counter updates through atomic increments or compare-and-set
//! - `profile_gate`: Per-actor profile check
//! - `controller`: The single-flight toggle state machine
//! - `reconciler`: Counter recount and drift reporting
pub mod config;
pub mod controller;
pub mod counter_store;
pub mod errors;
pub mod profile_gate;
pub mod reconciler;
pub mod transition;
pub mod vote_store;

pub use config::{ControllerConfig, CounterWriteMode};
pub use controller::{
    InteractionController, Notice, NoticeKind, Settled, Settlement, TargetView, ToggleOutcome,
};
pub use counter_store::CounterStore;
pub use errors::{ControllerError, ToggleError};
pub use profile_gate::{GateState, ProfileGate};
pub use reconciler::{Reconciler, Recount};
pub use transition::{Transition, delta_between, next_state, transition};
pub use vote_store::{Source, VoteLookup, VoteRecordStore};
