//! Configuration module for the interactions service.
//! Reads settings from the environment and builds the service dependencies.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{Settings, StoreMode};
