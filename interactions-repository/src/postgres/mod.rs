//! PostgreSQL implementation of the interactions repository.
//!
//! ## Database Tables
//!
//! - `profiles`: Actors allowed to vote
//! - `vote_records`: One row per (actor, target) with the liked/disliked pair
//! - `target_counters`: Aggregated like and dislike counts per target
//!
//! Queries are built at runtime so the crate compiles without a database.
mod counter_repository;
mod profile_directory;
mod vote_repository;

pub use counter_repository::PostgresCounterRepository;
pub use profile_directory::PostgresProfileDirectory;
pub use vote_repository::PostgresVoteRepository;

use sqlx::PgPool;

use crate::errors::RepositoryError;

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
