//! # Interactions Repository
//! This crate provides the persistence ports of the interactions subsystem and
//! their implementations: PostgreSQL for the remote store, an in-memory store
//! for tests and development, and the per-session local vote caches.
pub mod cache;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;
mod source;

pub use cache::{FileVoteCache, MemoryVoteCache};
pub use errors::{CacheError, RepositoryError};
pub use interfaces::{CounterRepository, LocalVoteCache, ProfileDirectory, VoteRepository};
pub use memory::MemoryStore;
pub use postgres::{PostgresCounterRepository, PostgresProfileDirectory, PostgresVoteRepository};
pub use source::{Backend, StoreSource};
