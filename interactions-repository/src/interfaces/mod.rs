//! This module defines and re-exports the persistence ports of the
//! interactions subsystem.
mod cache;
mod counters;
mod profiles;
mod votes;

pub use cache::LocalVoteCache;
pub use counters::CounterRepository;
pub use profiles::ProfileDirectory;
pub use votes::VoteRepository;
