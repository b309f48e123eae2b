//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `trellis-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ResourceLoader`: Resolve a location to bytes
//!   - `PropertySourceFactory`: Turn an encoded resource into a property source
//!   - `TransactionManager`: Transaction boundaries for intercepted calls
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    PropertySourceFactory, ResourceLoader, TransactionDefinition, TransactionManager,
    TransactionStatus,
};

#[cfg(test)]
pub use output::MockResourceLoader;
