//! Property Source Processor - loads descriptors into an environment.
//!
//! For every location of a descriptor the processor:
//! 1. Resolves `${...}` placeholders against the environment
//! 2. Loads the resource through the `ResourceLoader` port
//! 3. Builds a property source with the descriptor's factory
//! 4. Merges it into the environment's chain
//!
//! Merging keeps the chain ordered by processing: each new name goes in
//! front of the most recently processed name still present, so later
//! descriptors override earlier ones while everything the processor adds
//! stays behind sources registered before it ran. A name seen before turns
//! its entry into a composite with the newest source searched first.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{PropertySourceFactory, ResourceLoader},
        services::FactoryRegistry,
    },
    domain::{
        CompositePropertySource, ConfigurableEnvironment, DomainValidator as validator,
        EncodedResource, PropertySource, PropertySourceDescriptor,
    },
    error::TrellisResult,
};

/// A location skipped because the descriptor tolerates missing resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLocation {
    pub location: String,
    pub reason: String,
}

/// What happened to the locations of one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    /// Resolved locations that produced a property source.
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedLocation>,
}

impl ProcessOutcome {
    pub fn merge(&mut self, other: ProcessOutcome) {
        self.loaded.extend(other.loaded);
        self.skipped.extend(other.skipped);
    }
}

/// Stateful processor for one configuration-loading pass.
///
/// Remembers every name it has added, in order. Takes `&mut self`, so calls
/// on one instance are serialized.
pub struct PropertySourceProcessor<E: ConfigurableEnvironment> {
    environment: E,
    loader: Arc<dyn ResourceLoader>,
    factories: FactoryRegistry,
    property_source_names: Vec<String>,
}

impl<E: ConfigurableEnvironment> PropertySourceProcessor<E> {
    pub fn new(environment: E, loader: Arc<dyn ResourceLoader>, factories: FactoryRegistry) -> Self {
        Self {
            environment,
            loader,
            factories,
            property_source_names: Vec::new(),
        }
    }

    /// Load every location of `descriptor` into the environment.
    ///
    /// Fails fast on configuration errors. Resource-resolution errors are
    /// skipped when the descriptor ignores missing resources.
    #[instrument(skip_all, fields(descriptor = %descriptor))]
    pub fn process_property_source(
        &mut self,
        descriptor: &PropertySourceDescriptor,
    ) -> TrellisResult<ProcessOutcome> {
        validator::validate_descriptor(descriptor)?;
        let factory = Arc::clone(self.factories.resolve(descriptor.factory())?);

        let mut outcome = ProcessOutcome::default();
        for location in descriptor.locations() {
            match self.load_location(descriptor, factory.as_ref(), location) {
                Ok(resolved) => outcome.loaded.push(resolved),
                Err(err) if descriptor.ignore_resource_not_found() && err.is_resource_resolution() => {
                    info!(
                        location = %location,
                        "Properties location not resolvable: {}", err
                    );
                    outcome.skipped.push(SkippedLocation {
                        location: location.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }

    fn load_location(
        &mut self,
        descriptor: &PropertySourceDescriptor,
        factory: &dyn PropertySourceFactory,
        location: &str,
    ) -> TrellisResult<String> {
        let resolved = self.environment.resolve_required_placeholders(location)?;
        let resource = self.loader.get_resource(&resolved)?;
        let encoded = EncodedResource::new(resource, descriptor.encoding())?;
        let source = factory.create_property_source(descriptor.name(), &encoded)?;
        self.add_property_source(source)?;
        Ok(resolved)
    }

    /// Merge `source` into the environment's chain.
    #[instrument(skip_all, fields(name = %source.name()))]
    pub fn add_property_source(&mut self, source: PropertySource) -> TrellisResult<()> {
        let name = source.name().to_string();
        let sources = self.environment.property_sources_mut();

        if self.property_source_names.contains(&name) {
            if let Some(existing) = sources.get(&name) {
                let newest = source.with_resource_name();
                let composite = match existing.clone() {
                    PropertySource::Composite(mut composite) => {
                        composite.add_first_property_source(newest);
                        composite
                    }
                    previous => {
                        let mut composite = CompositePropertySource::new(name.as_str());
                        composite.add_property_source(newest);
                        composite.add_property_source(previous.with_resource_name());
                        composite
                    }
                };
                debug!(members = ?composite.source_names(), "Merged into composite");
                sources.replace(&name, composite.into())?;
                return Ok(());
            }
        }

        let anchor = self
            .property_source_names
            .iter()
            .rev()
            .find(|candidate| sources.contains(candidate))
            .cloned();
        match anchor {
            Some(anchor) => {
                debug!(before = %anchor, "Adding property source");
                sources.add_before(&anchor, source)?;
            }
            None => {
                debug!("Adding property source last");
                sources.add_last(source);
            }
        }

        if !self.property_source_names.contains(&name) {
            self.property_source_names.push(name);
        }
        Ok(())
    }

    /// Names added so far, in processing order.
    pub fn property_source_names(&self) -> &[String] {
        &self.property_source_names
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn into_environment(self) -> E {
        self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockResourceLoader};
    use crate::domain::{MapPropertySource, PropertySources, Resource, StandardEnvironment};
    use crate::error::{ErrorCategory, TrellisError};

    /// Parses `key=value` lines.
    struct LineFactory;

    impl PropertySourceFactory for LineFactory {
        fn create_property_source(
            &self,
            name: Option<&str>,
            resource: &EncodedResource,
        ) -> TrellisResult<PropertySource> {
            let text = resource.read_to_string()?;
            let description = resource.resource().description();
            let pairs = text
                .lines()
                .filter_map(|line| line.split_once('='))
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()));
            Ok(MapPropertySource::from_resource(
                name.unwrap_or(description),
                description,
                pairs,
            )
            .into())
        }
    }

    fn loader(files: &'static [(&'static str, &'static str)]) -> Arc<dyn ResourceLoader> {
        let mut loader = MockResourceLoader::new();
        loader.expect_get_resource().returning(move |location| {
            files
                .iter()
                .find(|(path, _)| *path == location)
                .map(|(path, content)| Resource::new(*path, format!("file [{path}]"), *content))
                .ok_or_else(|| {
                    ApplicationError::ResourceNotFound {
                        location: location.to_string(),
                        reason: "no such file".into(),
                    }
                    .into()
                })
        });
        Arc::new(loader)
    }

    fn processor(
        files: &'static [(&'static str, &'static str)],
    ) -> PropertySourceProcessor<StandardEnvironment> {
        PropertySourceProcessor::new(
            StandardEnvironment::new(),
            loader(files),
            FactoryRegistry::new(Arc::new(LineFactory)),
        )
    }

    fn named(name: &str, location: &str) -> PropertySourceDescriptor {
        PropertySourceDescriptor::builder()
            .name(name)
            .location(location)
            .build()
            .unwrap()
    }

    fn chain(processor: &PropertySourceProcessor<StandardEnvironment>) -> &PropertySources {
        processor.environment().property_sources()
    }

    #[test]
    fn empty_locations_fail_before_any_loading() {
        let mut processor = PropertySourceProcessor::new(
            StandardEnvironment::new(),
            Arc::new(MockResourceLoader::new()),
            FactoryRegistry::new(Arc::new(LineFactory)),
        );
        let descriptor: PropertySourceDescriptor =
            serde_json::from_str(r#"{"name": "app", "locations": []}"#).unwrap();

        let err = processor.process_property_source(&descriptor).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(chain(&processor).is_empty());
    }

    #[test]
    fn later_names_take_precedence() {
        let mut processor = processor(&[
            ("a.properties", "k=a"),
            ("b.properties", "k=b"),
            ("c.properties", "k=c"),
        ]);

        for name in ["a", "b", "c"] {
            processor
                .process_property_source(&named(name, &format!("{name}.properties")))
                .unwrap();
        }

        assert_eq!(chain(&processor).names(), vec!["c", "b", "a"]);
        assert_eq!(chain(&processor).get_property("k"), Some("c"));
    }

    #[test]
    fn new_names_go_before_last_processed_name() {
        let mut processor = processor(&[("a.properties", "k=a"), ("b.properties", "k=b")]);
        processor
            .add_property_source(MapPropertySource::new("commandLineArgs", [("k", "cli")]).into())
            .unwrap();
        // Registered outside the processor.
        processor.environment.property_sources_mut().add_first(
            MapPropertySource::new("systemProperties", [("k", "sys")]).into(),
        );

        processor.process_property_source(&named("a", "a.properties")).unwrap();
        processor.process_property_source(&named("b", "b.properties")).unwrap();

        assert_eq!(
            chain(&processor).names(),
            vec!["systemProperties", "b", "a", "commandLineArgs"]
        );
    }

    #[test]
    fn same_name_merges_into_composite_newest_first() {
        let mut processor = processor(&[("l1.properties", "k=1\nonly1=x"), ("l2.properties", "k=2")]);

        processor.process_property_source(&named("x", "l1.properties")).unwrap();
        processor.process_property_source(&named("x", "l2.properties")).unwrap();

        let sources = chain(&processor);
        assert_eq!(sources.names(), vec!["x"]);
        let composite = sources.get("x").and_then(PropertySource::as_composite).unwrap();
        assert_eq!(
            composite.source_names(),
            vec!["file [l2.properties]", "file [l1.properties]"]
        );
        assert_eq!(sources.get_property("k"), Some("2"));
        assert_eq!(sources.get_property("only1"), Some("x"));
    }

    #[test]
    fn third_source_is_prepended_to_existing_composite() {
        let mut processor = processor(&[
            ("l1.properties", "k=1"),
            ("l2.properties", "k=2"),
            ("l3.properties", "k=3"),
        ]);

        for location in ["l1.properties", "l2.properties", "l3.properties"] {
            processor.process_property_source(&named("x", location)).unwrap();
        }

        let composite = chain(&processor)
            .get("x")
            .and_then(PropertySource::as_composite)
            .unwrap();
        assert_eq!(composite.sources().len(), 3);
        assert_eq!(chain(&processor).get_property("k"), Some("3"));
    }

    #[test]
    fn missing_resource_is_skipped_when_ignored() {
        let mut processor = processor(&[("present.properties", "k=v")]);
        let descriptor = PropertySourceDescriptor::builder()
            .name("opt")
            .locations(["missing.properties", "present.properties"])
            .ignore_resource_not_found(true)
            .build()
            .unwrap();

        let outcome = processor.process_property_source(&descriptor).unwrap();

        assert_eq!(outcome.loaded, vec!["present.properties"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].location, "missing.properties");
        assert_eq!(chain(&processor).names(), vec!["opt"]);
    }

    #[test]
    fn missing_resource_fails_when_not_ignored() {
        let mut processor = processor(&[]);

        let err = processor
            .process_property_source(&named("req", "missing.properties"))
            .unwrap_err();

        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::ResourceNotFound { .. })
        ));
        assert!(chain(&processor).is_empty());
    }

    #[test]
    fn placeholders_in_locations_resolve_against_environment() {
        let mut processor = processor(&[("conf/prod.properties", "mode=prod")]);
        processor
            .add_property_source(MapPropertySource::new("defaults", [("profile", "prod")]).into())
            .unwrap();

        let outcome = processor
            .process_property_source(&named("app", "conf/${profile}.properties"))
            .unwrap();

        assert_eq!(outcome.loaded, vec!["conf/prod.properties"]);
        assert_eq!(chain(&processor).get_property("mode"), Some("prod"));
    }

    #[test]
    fn unresolvable_placeholder_is_skippable() {
        let mut processor = processor(&[]);
        let descriptor = PropertySourceDescriptor::builder()
            .location("conf/${missing}.properties")
            .ignore_resource_not_found(true)
            .build()
            .unwrap();

        let outcome = processor.process_property_source(&descriptor).unwrap();

        assert!(outcome.loaded.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn unknown_factory_is_fatal_even_when_ignoring_missing() {
        let mut processor = processor(&[("a.properties", "k=a")]);
        let descriptor = PropertySourceDescriptor::builder()
            .location("a.properties")
            .factory("yaml")
            .ignore_resource_not_found(true)
            .build()
            .unwrap();

        let err = processor.process_property_source(&descriptor).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn unnamed_descriptor_uses_resource_description() {
        let mut processor = processor(&[("a.properties", "k=a")]);

        processor
            .process_property_source(&PropertySourceDescriptor::for_locations(["a.properties"]).unwrap())
            .unwrap();

        assert_eq!(chain(&processor).names(), vec!["file [a.properties]"]);
    }
}
