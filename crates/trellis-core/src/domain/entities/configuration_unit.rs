use serde::{Deserialize, Serialize};

use crate::domain::{entities::descriptor::PropertySourceDescriptor, error::DomainError};

/// A named group of property source declarations, processed as one step.
///
/// Units are processed in sequence; declarations inside a unit keep their
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationUnit {
    name: String,
    #[serde(default, rename = "property_source")]
    property_sources: Vec<PropertySourceDescriptor>,
}

impl ConfigurationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_sources: Vec::new(),
        }
    }

    pub fn with_property_source(mut self, descriptor: PropertySourceDescriptor) -> Self {
        self.property_sources.push(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_sources(&self) -> &[PropertySourceDescriptor] {
        &self.property_sources
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidConfigurationUnit(
                "unit name must not be blank".into(),
            ));
        }
        self.property_sources
            .iter()
            .try_for_each(PropertySourceDescriptor::validate)
    }
}
