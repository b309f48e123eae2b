//! Property Source Registry - declared descriptors, in declaration order.

use tracing::debug;

use crate::{
    domain::{ConfigurationUnit, DomainError, DomainValidator as validator, PropertySourceDescriptor},
    error::TrellisResult,
};

/// A descriptor and the unit that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDescriptor {
    pub origin: String,
    pub descriptor: PropertySourceDescriptor,
}

/// Validated descriptors awaiting processing. Performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct PropertySourceRegistry {
    origins: Vec<String>,
    entries: Vec<RegisteredDescriptor>,
}

impl PropertySourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every descriptor of `unit`. Nothing is registered when any
    /// of them is invalid.
    pub fn register_unit(&mut self, unit: &ConfigurationUnit) -> TrellisResult<usize> {
        validator::validate_configuration_unit(unit)?;
        if self.origins.iter().any(|origin| origin == unit.name()) {
            return Err(DomainError::InvalidConfigurationUnit(format!(
                "unit '{}' is already registered",
                unit.name()
            ))
            .into());
        }

        self.origins.push(unit.name().to_string());
        self.entries
            .extend(unit.property_sources().iter().map(|descriptor| RegisteredDescriptor {
                origin: unit.name().to_string(),
                descriptor: descriptor.clone(),
            }));
        debug!(
            unit = unit.name(),
            descriptors = unit.property_sources().len(),
            "Registered configuration unit"
        );
        Ok(unit.property_sources().len())
    }

    /// Register a single descriptor under `origin`.
    pub fn register(
        &mut self,
        origin: impl Into<String>,
        descriptor: PropertySourceDescriptor,
    ) -> TrellisResult<()> {
        validator::validate_descriptor(&descriptor)?;
        let origin = origin.into();
        if !self.origins.contains(&origin) {
            self.origins.push(origin.clone());
        }
        self.entries.push(RegisteredDescriptor { origin, descriptor });
        Ok(())
    }

    pub fn descriptors(&self) -> &[RegisteredDescriptor] {
        &self.entries
    }

    pub fn descriptors_for<'a>(
        &'a self,
        origin: &'a str,
    ) -> impl Iterator<Item = &'a PropertySourceDescriptor> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.origin == origin)
            .map(|entry| &entry.descriptor)
    }

    /// Unit names in registration order.
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn descriptor(location: &str) -> PropertySourceDescriptor {
        PropertySourceDescriptor::for_locations([location]).unwrap()
    }

    #[test]
    fn keeps_declaration_order_across_units() {
        let mut registry = PropertySourceRegistry::new();
        registry
            .register_unit(
                &ConfigurationUnit::new("base")
                    .with_property_source(descriptor("a.properties"))
                    .with_property_source(descriptor("b.properties")),
            )
            .unwrap();
        registry
            .register_unit(&ConfigurationUnit::new("prod").with_property_source(descriptor("c.properties")))
            .unwrap();

        let locations: Vec<&str> = registry
            .descriptors()
            .iter()
            .map(|entry| entry.descriptor.locations()[0].as_str())
            .collect();
        assert_eq!(locations, vec!["a.properties", "b.properties", "c.properties"]);
        assert_eq!(registry.descriptors_for("base").count(), 2);
        assert_eq!(registry.origins(), ["base", "prod"]);
    }

    #[test]
    fn invalid_unit_registers_nothing() {
        let mut registry = PropertySourceRegistry::new();
        let empty: PropertySourceDescriptor =
            serde_json::from_str(r#"{"locations": []}"#).unwrap();
        let unit = ConfigurationUnit::new("broken")
            .with_property_source(descriptor("a.properties"))
            .with_property_source(empty);

        let err = registry.register_unit(&unit).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_unit_is_rejected() {
        let mut registry = PropertySourceRegistry::new();
        let unit = ConfigurationUnit::new("base").with_property_source(descriptor("a.properties"));
        registry.register_unit(&unit).unwrap();

        assert!(registry.register_unit(&unit).is_err());
        assert_eq!(registry.len(), 1);
    }
}
