//! Infrastructure layer: configuration, persistence and query push-down.

pub mod config;
pub mod repository;
pub mod sql;

pub use config::{CatalogConfig, ConfigError};
pub use repository::{InMemoryRepository, RepositoryError};
pub use sql::SqlSelect;
