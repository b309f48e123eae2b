//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "load these property sources" or
//! "register these configuration units".

pub mod configuration_service;
pub mod factory_registry;
pub mod property_source_processor;
pub mod property_source_registry;

pub use configuration_service::{ConfigurationService, LoadReport};
pub use factory_registry::FactoryRegistry;
pub use property_source_processor::{ProcessOutcome, PropertySourceProcessor, SkippedLocation};
pub use property_source_registry::{PropertySourceRegistry, RegisteredDescriptor};
