//! Interactions Service Library
//!
//! Wires the interactions controller to its stores from environment
//! configuration and implements the maintenance commands of the binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;

pub use config::{Dependencies, Settings, StoreMode};
pub use errors::{AppError, ConfigError};
