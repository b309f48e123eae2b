//! `trellis get`: print one resolved property.

use serde::Serialize;
use tracing::debug;
use trellis_core::prelude::*;

use crate::{
    cli::GetArgs,
    commands::{Loaded, load_environment},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize, PartialEq)]
struct PropertyView {
    key: String,
    value: String,
    source: String,
}

pub fn execute(args: GetArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.key.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: "property key must not be blank".into(),
        });
    }
    let Loaded { environment, .. } = load_environment(&args.source, &config)?;
    let view = lookup(&environment, &args.key, args.raw)?;
    debug!(key = %view.key, source = %view.source, "Property resolved");

    if output.is_json() {
        output.json(&view)
    } else {
        output.value(&view.value)?;
        Ok(())
    }
}

fn lookup(environment: &StandardEnvironment, key: &str, raw: bool) -> CliResult<PropertyView> {
    let sources = environment.property_sources();
    let Some(source) = sources.iter().find(|source| source.contains_property(key)) else {
        return Err(CliError::PropertyNotFound {
            key: key.to_string(),
            sources: sources.names().into_iter().map(str::to_string).collect(),
        });
    };

    let value = if raw {
        source.get_property(key).map(str::to_string)
    } else {
        environment.get_property(key).map_err(TrellisError::from)?
    };

    Ok(PropertyView {
        key: key.to_string(),
        value: value.unwrap_or_default(),
        source: source.name().to_string(),
    })
}
