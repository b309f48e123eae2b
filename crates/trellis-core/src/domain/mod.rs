// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Trellis.
//!
//! This module contains pure logic with no I/O. Resources arrive already
//! read, and loading is delegated to ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: Observability lives in the application layer
//! - **Owned state**: The property source chain is mutated only through
//!   `&mut` access, so a single writer is enforced by the compiler
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod interception;
pub mod placeholder;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    configuration_unit::ConfigurationUnit,
    descriptor::{PropertySourceDescriptor, PropertySourceDescriptorBuilder},
    environment::{ConfigurableEnvironment, StandardEnvironment},
    property_source::{CompositePropertySource, MapPropertySource, PropertySource},
    property_sources::PropertySources,
    resource::{Charset, EncodedResource, Resource},
};

pub use error::{DomainError, ErrorCategory};
pub use placeholder::PlaceholderResolver;
pub use validation::DomainValidator;
