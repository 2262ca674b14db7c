//! In-memory implementation of the remote stores.
//!
//! `MemoryStore` implements `VoteRepository`, `CounterRepository` and
//! `ProfileDirectory` over plain maps. It mirrors the PostgreSQL semantics
//! (eligibility check on vote writes, zero-clamped increments, recount from
//! records) and adds failure switches so callers can exercise their rollback
//! paths.
mod store;

pub use store::{FailureSwitches, MemoryStore};
