//! Application layer for Trellis.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ConfigurationService, PropertySourceProcessor)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Interceptors**: Built-in cross-cutting behavior for proxied calls
//! - **Errors**: Application-specific error types
//!
//! Chain ordering and merge invariants live in `crate::domain`; this layer
//! adds I/O through ports and observability through `tracing`.

pub mod error;
pub mod interceptors;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ConfigurationService, FactoryRegistry, LoadReport, ProcessOutcome, PropertySourceProcessor,
    PropertySourceRegistry, RegisteredDescriptor, SkippedLocation,
};

// Re-export port traits (for adapter implementation)
pub use ports::{PropertySourceFactory, ResourceLoader, TransactionManager};

pub use error::ApplicationError;
