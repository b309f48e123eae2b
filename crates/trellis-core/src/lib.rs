//! Trellis Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Trellis:
//! property-source resolution into an ordered environment chain, and an
//! ordered method-interception chain with proxy dispatch.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           trellis-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ConfigurationService, Processor,       │
//! │  built-in interceptors)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (ResourceLoader, PropertySourceFactory, │
//! │  TransactionManager)                    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   trellis-adapters (Infrastructure)     │
//! │ (FileSystemResourceLoader, factories)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (PropertySources, Environment, Proxy,   │
//! │  InterceptorChain, MethodInvocation)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trellis_core::prelude::*;
//!
//! // `loader` and `factory` come from trellis-adapters.
//! fn load(
//!     loader: Arc<dyn ResourceLoader>,
//!     factory: Arc<dyn PropertySourceFactory>,
//! ) -> TrellisResult<StandardEnvironment> {
//!     let descriptor = PropertySourceDescriptor::builder()
//!         .name("app")
//!         .location("classpath:app.properties")
//!         .build()?;
//!
//!     let mut processor = PropertySourceProcessor::new(
//!         StandardEnvironment::new(),
//!         loader,
//!         FactoryRegistry::new(factory),
//!     );
//!     processor.process_property_source(&descriptor)?;
//!     Ok(processor.into_environment())
//! }
//! ```

// Domain layer (pure, no I/O, no logging)
pub mod domain;

// Application layer (orchestration, ports, interceptors)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigurationService, FactoryRegistry, LoadReport, ProcessOutcome,
        PropertySourceProcessor, PropertySourceRegistry,
        ports::{PropertySourceFactory, ResourceLoader, TransactionManager},
    };
    pub use crate::domain::{
        CompositePropertySource, ConfigurableEnvironment, ConfigurationUnit, EncodedResource,
        MapPropertySource, PropertySource, PropertySourceDescriptor, PropertySources, Resource,
        StandardEnvironment,
        interception::{
            Advisor, InterceptorChain, Invocable, InvocationError, InvocationResult,
            MethodInterceptor, MethodInvocation, MethodMatcher, MethodTable, Proxy, ProxyFactory,
            Value,
        },
    };
    pub use crate::error::{TrellisError, TrellisResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
