use crate::domain::{
    entities::{ConfigurationUnit, PropertySourceDescriptor},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_descriptor(descriptor: &PropertySourceDescriptor) -> Result<(), DomainError> {
        descriptor.validate()
    }

    pub fn validate_configuration_unit(unit: &ConfigurationUnit) -> Result<(), DomainError> {
        unit.validate()
    }
}
