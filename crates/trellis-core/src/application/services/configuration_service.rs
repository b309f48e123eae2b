//! Configuration Service - main configuration-loading orchestrator.
//!
//! This service coordinates the loading workflow:
//! 1. Register configuration units (validated, no I/O)
//! 2. Process their descriptors in registration order
//! 3. Report what was loaded and what was skipped
//!
//! Any configuration error aborts the pass.

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::services::{
        PropertySourceProcessor, PropertySourceRegistry,
        property_source_processor::{ProcessOutcome, SkippedLocation},
    },
    domain::{ConfigurableEnvironment, ConfigurationUnit},
    error::TrellisResult,
};

/// Summary of one loading pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub units: Vec<String>,
    pub descriptors: usize,
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedLocation>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Registers configuration units and loads them into an environment.
pub struct ConfigurationService<E: ConfigurableEnvironment> {
    registry: PropertySourceRegistry,
    processor: PropertySourceProcessor<E>,
    processed: usize,
}

impl<E: ConfigurableEnvironment> ConfigurationService<E> {
    pub fn new(processor: PropertySourceProcessor<E>) -> Self {
        Self {
            registry: PropertySourceRegistry::new(),
            processor,
            processed: 0,
        }
    }

    pub fn register_unit(&mut self, unit: &ConfigurationUnit) -> TrellisResult<()> {
        self.registry.register_unit(unit).map(|_| ())
    }

    /// Process every descriptor registered since the last call.
    ///
    /// A descriptor counts as processed once attempted, so a failed pass
    /// resumes after the descriptor that failed instead of merging the
    /// earlier ones a second time.
    #[instrument(skip_all, fields(pending = self.registry.len() - self.processed))]
    pub fn load(&mut self) -> TrellisResult<LoadReport> {
        let pending = &self.registry.descriptors()[self.processed..];
        let mut report = LoadReport::default();
        let mut outcome = ProcessOutcome::default();

        for entry in pending {
            if report.units.last() != Some(&entry.origin) {
                info!(unit = %entry.origin, "Processing configuration unit");
                report.units.push(entry.origin.clone());
            }
            self.processed += 1;
            outcome.merge(self.processor.process_property_source(&entry.descriptor)?);
            report.descriptors += 1;
        }

        report.loaded = outcome.loaded;
        report.skipped = outcome.skipped;
        info!(
            descriptors = report.descriptors,
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            "Configuration loaded"
        );
        Ok(report)
    }

    /// Register `units` and load them in one pass.
    pub fn load_units(&mut self, units: &[ConfigurationUnit]) -> TrellisResult<LoadReport> {
        units.iter().try_for_each(|unit| self.register_unit(unit))?;
        self.load()
    }

    pub fn registry(&self) -> &PropertySourceRegistry {
        &self.registry
    }

    pub fn processor(&self) -> &PropertySourceProcessor<E> {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut PropertySourceProcessor<E> {
        &mut self.processor
    }

    pub fn environment(&self) -> &E {
        self.processor.environment()
    }

    pub fn into_environment(self) -> E {
        self.processor.into_environment()
    }
}
