//! Named property sources.
//!
//! A [`PropertySource`] is either a single map of properties or a
//! [`CompositePropertySource`] that searches an ordered list of sources
//! first to last. Composites are only ever created by merging two sources
//! that share a name.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A named source of string properties.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySource {
    Map(MapPropertySource),
    Composite(CompositePropertySource),
}

impl PropertySource {
    pub fn name(&self) -> &str {
        match self {
            Self::Map(source) => source.name(),
            Self::Composite(source) => source.name(),
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        match self {
            Self::Map(source) => source.get_property(key),
            Self::Composite(source) => source.get_property(key),
        }
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.get_property(key).is_some()
    }

    /// All keys this source can answer, without duplicates.
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            Self::Map(source) => source.properties.keys().map(String::as_str).collect(),
            Self::Composite(source) => source.property_names(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    pub fn as_composite(&self) -> Option<&CompositePropertySource> {
        match self {
            Self::Composite(source) => Some(source),
            Self::Map(_) => None,
        }
    }

    /// Description of the resource this source was loaded from.
    pub fn resource_description(&self) -> Option<&str> {
        match self {
            Self::Map(source) => source.resource_description(),
            Self::Composite(_) => None,
        }
    }

    /// Rename a resource-backed source to its resource description.
    ///
    /// Members of a composite all share the composite's name; renaming keeps
    /// each of them identifiable. Sources without a resource are unchanged.
    pub fn with_resource_name(self) -> Self {
        match self {
            Self::Map(source) => Self::Map(source.with_resource_name()),
            composite => composite,
        }
    }
}

impl From<MapPropertySource> for PropertySource {
    fn from(source: MapPropertySource) -> Self {
        Self::Map(source)
    }
}

impl From<CompositePropertySource> for PropertySource {
    fn from(source: CompositePropertySource) -> Self {
        Self::Composite(source)
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(source) => write!(f, "{} ({} properties)", source.name, source.len()),
            Self::Composite(source) => {
                write!(f, "{} [{}]", source.name, source.source_names().join(", "))
            }
        }
    }
}

/// An immutable map of properties, cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPropertySource {
    name: String,
    resource: Option<String>,
    properties: Arc<BTreeMap<String, String>>,
}

impl MapPropertySource {
    pub fn new<I, K, V>(name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            resource: None,
            properties: Arc::new(
                properties
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// A source loaded from a resource; `resource` is its description.
    pub fn from_resource<I, K, V>(
        name: impl Into<String>,
        resource: impl Into<String>,
        properties: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            resource: Some(resource.into()),
            ..Self::new(name, properties)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_description(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn with_resource_name(mut self) -> Self {
        if let Some(resource) = &self.resource {
            self.name = resource.clone();
        }
        self
    }
}

/// A named, ordered aggregate of property sources.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePropertySource {
    name: String,
    sources: Vec<PropertySource>,
}

impl CompositePropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a source with the lowest precedence inside this composite.
    pub fn add_property_source(&mut self, source: PropertySource) {
        self.sources.push(source);
    }

    /// Prepend a source with the highest precedence inside this composite.
    pub fn add_first_property_source(&mut self, source: PropertySource) {
        self.sources.insert(0, source);
    }

    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(PropertySource::name).collect()
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.sources.iter().find_map(|s| s.get_property(key))
    }

    pub fn property_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .flat_map(PropertySource::property_names)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}
