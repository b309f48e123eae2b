//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `trellis-adapters` crate provides implementations.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EncodedResource, PropertySource, Resource};
use crate::error::TrellisResult;

/// Port for resolving resource locations.
///
/// Implemented by:
/// - `trellis_adapters::resource::FileSystemResourceLoader` (production)
/// - `trellis_adapters::resource::InMemoryResourceLoader` (testing)
///
/// A missing resource must be reported as
/// `ApplicationError::ResourceNotFound` so descriptors that ignore missing
/// resources can skip it.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceLoader: Send + Sync {
    /// Load the resource at a fully resolved location.
    fn get_resource(&self, location: &str) -> TrellisResult<Resource>;
}

/// Port for building property sources from resources.
///
/// Implemented by:
/// - `trellis_adapters::factory::PropertiesPropertySourceFactory`
/// - `trellis_adapters::factory::TomlPropertySourceFactory`
/// - `trellis_adapters::factory::JsonPropertySourceFactory`
/// - `trellis_adapters::factory::DefaultPropertySourceFactory` (by extension)
pub trait PropertySourceFactory: Send + Sync {
    /// Build a source named `name`, or after the resource when `None`.
    fn create_property_source(
        &self,
        name: Option<&str>,
        resource: &EncodedResource,
    ) -> TrellisResult<PropertySource>;
}

/// What a transactional call asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDefinition {
    pub name: String,
    pub read_only: bool,
}

impl TransactionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read_only: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Handle for a transaction in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStatus {
    pub id: Uuid,
    pub name: String,
    /// `false` when the call joined a transaction already in progress.
    pub new_transaction: bool,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Port for transaction boundaries.
///
/// Implemented by:
/// - `trellis_adapters::transaction::InMemoryTransactionManager`
pub trait TransactionManager: Send + Sync {
    fn begin(&self, definition: &TransactionDefinition) -> TrellisResult<TransactionStatus>;

    fn commit(&self, status: &TransactionStatus) -> TrellisResult<()>;

    fn rollback(&self, status: &TransactionStatus) -> TrellisResult<()>;
}
