//! Error types for the interactions repository.
//! Consolidates and re-exports error types related to repository and cache operations.
mod cache;
mod repository;

pub use cache::CacheError;
pub use repository::RepositoryError;
