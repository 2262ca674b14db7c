//! # Interactions Shared
//! This crate defines the data structures shared across the interactions workspace.
//! It includes identifiers for actors and targets, vote records, vote states,
//! target counters and the deltas applied to them.
pub mod errors;
pub mod types;

pub use errors::TypeError;
