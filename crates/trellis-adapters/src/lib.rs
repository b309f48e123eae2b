//! Infrastructure adapters for Trellis.
//!
//! This crate implements the ports defined in `trellis-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod environment;
pub mod factory;
pub mod manifest;
pub mod resource;
pub mod transaction;

// Re-export commonly used adapters
pub use environment::{
    SYSTEM_ENVIRONMENT, standard_environment, system_environment, system_environment_from_os,
};
pub use factory::{
    DefaultPropertySourceFactory, JsonPropertySourceFactory, PropertiesPropertySourceFactory,
    TomlPropertySourceFactory, builtin_factories,
};
pub use manifest::ManifestLoader;
pub use resource::{FileSystemResourceLoader, InMemoryResourceLoader};
pub use transaction::InMemoryTransactionManager;
