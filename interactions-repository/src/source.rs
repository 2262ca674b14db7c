//! Selection of the remote store backend.
//!
//! ```ignore
//! use interactions_repository::StoreSource;
//!
//! // Development: in-memory store
//! let backend = StoreSource::mock().into_backend().await?;
//!
//! // Production: PostgreSQL
//! let backend = StoreSource::live("postgres://...").into_backend().await?;
//! ```
use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::errors::RepositoryError;
use crate::interfaces::{CounterRepository, ProfileDirectory, VoteRepository};
use crate::memory::MemoryStore;
use crate::postgres::{
    self, PostgresCounterRepository, PostgresProfileDirectory, PostgresVoteRepository,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration for the remote store backend.
#[derive(Debug, Clone)]
pub enum StoreSource {
    /// Use the in-memory store for testing/development.
    Mock,

    /// Use PostgreSQL storage.
    Live {
        /// PostgreSQL connection URL
        database_url: String,
        /// Upper bound of the connection pool
        max_connections: u32,
    },
}

impl StoreSource {
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live source with the given PostgreSQL URL and the default
    /// pool size.
    pub fn live(database_url: impl Into<String>) -> Self {
        Self::Live {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Overrides the pool size of a live source. No effect on a mock source.
    pub fn with_max_connections(self, max: u32) -> Self {
        match self {
            Self::Live { database_url, .. } => Self::Live {
                database_url,
                max_connections: max,
            },
            Self::Mock => Self::Mock,
        }
    }

    /// Connects the selected backend.
    pub async fn into_backend(self) -> Result<Backend, RepositoryError> {
        match self {
            Self::Mock => Ok(Backend::memory(Arc::new(MemoryStore::new()))),
            Self::Live {
                database_url,
                max_connections,
            } => {
                let pool = PgPoolOptions::new()
                    .max_connections(max_connections)
                    .connect(&database_url)
                    .await?;
                Ok(Backend::postgres(pool))
            }
        }
    }
}

/// The three remote stores a controller talks to.
#[derive(Clone)]
pub struct Backend {
    pub votes: Arc<dyn VoteRepository>,
    pub counters: Arc<dyn CounterRepository>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pool: Option<PgPool>,
}

impl Backend {
    /// All three stores served by one `MemoryStore`.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            votes: store.clone(),
            counters: store.clone(),
            profiles: store,
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            votes: Arc::new(PostgresVoteRepository::new(pool.clone())),
            counters: Arc::new(PostgresCounterRepository::new(pool.clone())),
            profiles: Arc::new(PostgresProfileDirectory::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Applies the schema migrations. A memory backend has nothing to migrate.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        match &self.pool {
            Some(pool) => postgres::migrate(pool).await,
            None => Ok(()),
        }
    }

    pub fn is_live(&self) -> bool {
        self.pool.is_some()
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("live", &self.is_live()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_source_pool_size() {
        let source = StoreSource::live("postgres://localhost/interactions").with_max_connections(3);
        assert!(matches!(source, StoreSource::Live { max_connections: 3, .. }));
        assert!(matches!(StoreSource::mock().with_max_connections(3), StoreSource::Mock));
    }

    #[tokio::test]
    async fn test_mock_backend_shares_one_store() {
        let backend = StoreSource::mock().into_backend().await.unwrap();
        assert!(!backend.is_live());
        backend.migrate().await.unwrap();

        let actor = interactions_shared::types::ActorId::new("0xAAA").unwrap();
        backend.profiles.create_profile(&actor).await.unwrap();
        assert!(backend.profiles.has_profile(&actor).await.unwrap());
    }
}
