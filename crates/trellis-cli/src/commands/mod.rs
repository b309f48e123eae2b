//! Subcommand handlers.

pub mod completions;
pub mod config;
pub mod get;
pub mod invoke;
pub mod resolve;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use trellis_adapters::{
    FileSystemResourceLoader, ManifestLoader, builtin_factories, manifest::manifest_base_dir,
    system_environment,
};
use trellis_core::prelude::*;

use crate::{cli::SourceArgs, config::AppConfig, error::CliResult};

/// Name of the source holding `-D` definitions.
pub const COMMAND_LINE_ARGS: &str = "commandLineArgs";

/// A fully loaded environment and what loading it did.
pub struct Loaded {
    pub manifest: PathBuf,
    pub environment: StandardEnvironment,
    pub report: LoadReport,
}

/// Load every unit of the manifest into a fresh environment.
///
/// The chain starts with `commandLineArgs` (when anything was defined) and
/// the process environment (unless disabled). The first loaded source is
/// added last, after the process environment, and later ones are inserted
/// ahead of it, so environment variables outrank every loaded file.
#[instrument(skip_all)]
pub fn load_environment(source: &SourceArgs, config: &AppConfig) -> CliResult<Loaded> {
    let manifest = source
        .manifest
        .clone()
        .unwrap_or_else(|| config.resolve.manifest.clone());
    let units = ManifestLoader::new().load(&manifest)?;

    let mut environment = StandardEnvironment::new();
    if !source.defines.is_empty() {
        environment.property_sources_mut().add_first(
            MapPropertySource::new(COMMAND_LINE_ARGS, source.defines.iter().cloned()).into(),
        );
    }
    if config.resolve.system_environment && !source.no_system_env {
        environment
            .property_sources_mut()
            .add_last(system_environment());
    }

    let roots = source
        .classpath_roots
        .iter()
        .chain(&config.resolve.classpath_roots)
        .cloned()
        .collect::<Vec<_>>();
    let base_dir = manifest_base_dir(&manifest);
    let mut loader = FileSystemResourceLoader::new(base_dir.clone());
    if !roots.is_empty() {
        loader = loader.with_classpath_roots(roots.into_iter().chain([base_dir]));
    }
    debug!(manifest = %manifest.display(), units = units.len(), "Loading manifest");

    let mut service = ConfigurationService::new(PropertySourceProcessor::new(
        environment,
        Arc::new(loader),
        builtin_factories(),
    ));
    let report = service.load_units(&units)?;

    Ok(Loaded {
        manifest,
        environment: service.into_environment(),
        report,
    })
}
