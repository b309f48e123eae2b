//! Declarative property source requests.
//!
//! A [`PropertySourceDescriptor`] says *what* should be loaded: a name, one
//! or more locations, an optional encoding and factory reference. It never
//! performs I/O. Loading is the job of `PropertySourceProcessor`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::resource::Charset, error::DomainError};

/// Immutable description of a property source to be loaded.
///
/// Invariant: `locations` is non-empty. Enforced by the builder and
/// re-checked by [`validate`](Self::validate) for deserialized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySourceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    locations: Vec<String>,
    #[serde(default)]
    ignore_resource_not_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    factory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
}

impl PropertySourceDescriptor {
    pub fn builder() -> PropertySourceDescriptorBuilder {
        PropertySourceDescriptorBuilder::default()
    }

    /// Shorthand for an unnamed descriptor over `locations`.
    pub fn for_locations<I, S>(locations: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().locations(locations).build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn ignore_resource_not_found(&self) -> bool {
        self.ignore_resource_not_found
    }

    /// Name of the factory to use, or `None` for the registry default.
    pub fn factory(&self) -> Option<&str> {
        self.factory.as_deref()
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Check the descriptor's invariants.
    ///
    /// Called by the builder; available for re-validation after
    /// deserialization.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.locations.is_empty() {
            return Err(DomainError::EmptyLocations {
                descriptor: self.to_string(),
            });
        }

        if let Some(blank) = self.locations.iter().position(|l| l.trim().is_empty()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "location #{} of '{}' is blank",
                blank + 1,
                self
            )));
        }

        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(DomainError::InvalidDescriptor(
                "name must not be blank when present".into(),
            ));
        }

        if matches!(&self.factory, Some(factory) if factory.trim().is_empty()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "factory reference of '{}' is blank",
                self
            )));
        }

        if let Some(encoding) = &self.encoding {
            Charset::from_label(encoding)?;
        }

        Ok(())
    }
}

impl fmt::Display for PropertySourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.locations.first()) {
            (Some(name), _) => write!(f, "{name}"),
            (None, Some(first)) if self.locations.len() > 1 => {
                write!(f, "{first} (+{} more)", self.locations.len() - 1)
            }
            (None, Some(first)) => write!(f, "{first}"),
            (None, None) => write!(f, "<unnamed>"),
        }
    }
}

/// Builder for [`PropertySourceDescriptor`].
#[derive(Debug, Default, Clone)]
pub struct PropertySourceDescriptorBuilder {
    name: Option<String>,
    locations: Vec<String>,
    ignore_resource_not_found: bool,
    factory: Option<String>,
    encoding: Option<String>,
}

impl PropertySourceDescriptorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one location. Order is significant: later locations override
    /// earlier ones when they share a name.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    pub fn locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    pub fn ignore_resource_not_found(mut self, ignore: bool) -> Self {
        self.ignore_resource_not_found = ignore;
        self
    }

    pub fn factory(mut self, factory: impl Into<String>) -> Self {
        self.factory = Some(factory.into());
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn build(self) -> Result<PropertySourceDescriptor, DomainError> {
        let descriptor = PropertySourceDescriptor {
            name: self.name,
            locations: self.locations,
            ignore_resource_not_found: self.ignore_resource_not_found,
            factory: self.factory,
            encoding: self.encoding,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}
