//! The environment: an ordered property source chain plus placeholder
//! resolution against it.

use crate::domain::{
    entities::property_sources::PropertySources, error::DomainError,
    placeholder::PlaceholderResolver,
};

/// What the property source pipeline needs from an environment.
pub trait ConfigurableEnvironment {
    fn property_sources(&self) -> &PropertySources;

    fn property_sources_mut(&mut self) -> &mut PropertySources;

    /// Substitute placeholders, leaving unresolvable ones in place.
    fn resolve_placeholders(&self, text: &str) -> Result<String, DomainError> {
        let sources = self.property_sources();
        PlaceholderResolver::lenient()
            .replace_placeholders(text, |key| sources.get_property(key).map(str::to_owned))
    }

    /// Substitute placeholders, failing on any that cannot be resolved.
    fn resolve_required_placeholders(&self, text: &str) -> Result<String, DomainError> {
        let sources = self.property_sources();
        PlaceholderResolver::strict()
            .replace_placeholders(text, |key| sources.get_property(key).map(str::to_owned))
    }

    /// Value for `key` with nested placeholders resolved leniently.
    fn get_property(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.property_sources().get_property(key) {
            Some(raw) => self.resolve_placeholders(raw).map(Some),
            None => Ok(None),
        }
    }

    fn get_required_property(&self, key: &str) -> Result<String, DomainError> {
        self.get_property(key)?
            .ok_or_else(|| DomainError::MissingRequiredProperty { key: key.into() })
    }

    fn contains_property(&self, key: &str) -> bool {
        self.property_sources().get_property(key).is_some()
    }
}

/// Default environment. Starts empty; adapters add system sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardEnvironment {
    property_sources: PropertySources,
}

impl StandardEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property_sources(property_sources: PropertySources) -> Self {
        Self { property_sources }
    }
}

impl ConfigurableEnvironment for StandardEnvironment {
    fn property_sources(&self) -> &PropertySources {
        &self.property_sources
    }

    fn property_sources_mut(&mut self) -> &mut PropertySources {
        &mut self.property_sources
    }
}
