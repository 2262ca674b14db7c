use std::sync::Arc;

use interactions_controller::{InteractionController, Reconciler};
use interactions_repository::{Backend, FileVoteCache, LocalVoteCache, MemoryVoteCache};
use tracing::info;

use crate::config::Settings;
use crate::errors::AppError;

/// `Dependencies` holds the stores and the controller built on top of them.
pub struct Dependencies {
    pub backend: Backend,
    pub cache: Arc<dyn LocalVoteCache>,
    pub controller: InteractionController,
    pub reconciler: Reconciler,
}

impl Dependencies {
    /// Connects the configured store and builds the controller.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Ready-to-use dependencies
    /// * `Err(AppError)` - If the database or the cache file cannot be opened
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let backend = settings.store_source()?.into_backend().await?;

        let cache: Arc<dyn LocalVoteCache> = match &settings.cache_file {
            Some(path) => Arc::new(FileVoteCache::open(path)?),
            None => Arc::new(MemoryVoteCache::new()),
        };

        info!(
            live = backend.is_live(),
            counter_mode = ?settings.counter_mode,
            cache_file = ?settings.cache_file,
            "Dependencies initialised"
        );

        Ok(Self::from_parts(backend, cache, settings))
    }

    pub fn from_parts(backend: Backend, cache: Arc<dyn LocalVoteCache>, settings: &Settings) -> Self {
        let controller =
            InteractionController::new(&backend, cache.clone(), settings.controller_config());
        let reconciler = Reconciler::new(backend.counters.clone());

        Self {
            backend,
            cache,
            controller,
            reconciler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_dependencies() {
        let dependencies = Dependencies::new(&Settings::mock()).await.unwrap();
        assert!(!dependencies.backend.is_live());
        assert!(dependencies.controller.is_alive());
    }

    #[tokio::test]
    async fn test_file_cache_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            cache_file: Some(dir.path().join("votes.json")),
            ..Settings::mock()
        };

        assert!(Dependencies::new(&settings).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreadable_cache_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        std::fs::write(&path, b"not json").unwrap();
        let settings = Settings {
            cache_file: Some(path),
            ..Settings::mock()
        };

        assert!(matches!(
            Dependencies::new(&settings).await,
            Err(AppError::Cache(_))
        ));
    }
}
