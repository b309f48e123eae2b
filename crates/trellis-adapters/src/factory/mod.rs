//! Property source factories for `.properties`, TOML and JSON resources.
//!
//! Every factory names the source after the descriptor when it has a name,
//! otherwise after the resource description. Sources keep the resource
//! description so they can be renamed when merged into a composite.

pub mod properties;
pub mod structured;

use thiserror::Error;
use tracing::debug;
use trellis_core::{
    application::{ApplicationError, FactoryRegistry, ports::PropertySourceFactory},
    domain::{EncodedResource, MapPropertySource, PropertySource},
    error::{TrellisError, TrellisResult},
};

use std::sync::Arc;

/// Syntax errors in a resource's content.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: malformed escape {escape}")]
    InvalidUnicodeEscape { line: usize, escape: String },

    #[error("document root must be a table")]
    NotATable,

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

type Parser = fn(&str) -> Result<Vec<(String, String)>, FormatError>;

fn create(
    factory: &str,
    parser: Parser,
    name: Option<&str>,
    resource: &EncodedResource,
) -> TrellisResult<PropertySource> {
    let text = resource.read_to_string()?;
    let description = resource.resource().description();
    let pairs = parser(&text).map_err(|e| failed(factory, description, e))?;
    debug!(
        factory,
        resource = description,
        properties = pairs.len(),
        "Property source created"
    );
    Ok(MapPropertySource::from_resource(name.unwrap_or(description), description, pairs).into())
}

fn failed(factory: &str, resource: &str, e: FormatError) -> TrellisError {
    ApplicationError::FactoryFailed {
        factory: factory.to_string(),
        resource: resource.to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// `.properties` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesPropertySourceFactory;

impl PropertySourceFactory for PropertiesPropertySourceFactory {
    fn create_property_source(
        &self,
        name: Option<&str>,
        resource: &EncodedResource,
    ) -> TrellisResult<PropertySource> {
        create("properties", properties::parse, name, resource)
    }
}

/// TOML documents, flattened.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlPropertySourceFactory;

impl PropertySourceFactory for TomlPropertySourceFactory {
    fn create_property_source(
        &self,
        name: Option<&str>,
        resource: &EncodedResource,
    ) -> TrellisResult<PropertySource> {
        create("toml", structured::parse_toml, name, resource)
    }
}

/// JSON documents, flattened.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPropertySourceFactory;

impl PropertySourceFactory for JsonPropertySourceFactory {
    fn create_property_source(
        &self,
        name: Option<&str>,
        resource: &EncodedResource,
    ) -> TrellisResult<PropertySource> {
        create("json", structured::parse_json, name, resource)
    }
}

/// Picks a format from the resource's file extension; anything unknown is
/// read as `.properties`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertySourceFactory;

impl PropertySourceFactory for DefaultPropertySourceFactory {
    fn create_property_source(
        &self,
        name: Option<&str>,
        resource: &EncodedResource,
    ) -> TrellisResult<PropertySource> {
        match resource.resource().extension().as_deref() {
            Some("toml") => TomlPropertySourceFactory.create_property_source(name, resource),
            Some("json") => JsonPropertySourceFactory.create_property_source(name, resource),
            _ => PropertiesPropertySourceFactory.create_property_source(name, resource),
        }
    }
}

/// Registry with the default factory plus `properties`, `toml` and `json`.
pub fn builtin_factories() -> FactoryRegistry {
    FactoryRegistry::new(Arc::new(DefaultPropertySourceFactory))
        .register("default", Arc::new(DefaultPropertySourceFactory))
        .register("properties", Arc::new(PropertiesPropertySourceFactory))
        .register("toml", Arc::new(TomlPropertySourceFactory))
        .register("json", Arc::new(JsonPropertySourceFactory))
}
