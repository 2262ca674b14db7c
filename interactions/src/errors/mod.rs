//! Error types for the interactions service.
//! Consolidates the errors of configuration, storage and the controller.
use interactions_controller::{ControllerError, ToggleError};
use interactions_repository::{CacheError, RepositoryError};
use interactions_shared::TypeError;

/// Represents errors raised while reading configuration from the environment.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid(var: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
    #[error("{0}")]
    Toggle(#[from] ToggleError),
    #[error("Invalid input: {0}")]
    Input(#[from] TypeError),
}
