//! `trellis resolve`: print the property source chain.

use std::collections::BTreeMap;

use serde::Serialize;
use trellis_core::prelude::*;

use crate::{
    cli::ResolveArgs,
    commands::{Loaded, load_environment},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// One source of the chain as printed.
#[derive(Debug, Serialize)]
pub struct SourceView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<SourceView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

impl SourceView {
    pub fn from_source(source: &PropertySource, with_properties: bool) -> Self {
        let members = source
            .as_composite()
            .map(|composite| {
                composite
                    .sources()
                    .iter()
                    .map(|member| Self::from_source(member, with_properties))
                    .collect()
            })
            .unwrap_or_default();

        // Composite properties are listed on the members.
        let properties = (with_properties && !source.is_composite()).then(|| {
            source
                .property_names()
                .into_iter()
                .filter_map(|key| {
                    source
                        .get_property(key)
                        .map(|value| (key.to_string(), value.to_string()))
                })
                .collect()
        });

        Self {
            name: source.name().to_string(),
            resource: source.resource_description().map(str::to_string),
            members,
            properties,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResolveView<'a> {
    manifest: String,
    sources: Vec<SourceView>,
    report: &'a LoadReport,
}

pub fn execute(args: ResolveArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let Loaded {
        manifest,
        environment,
        report,
    } = load_environment(&args.source, &config)?;

    let sources: Vec<SourceView> = environment
        .property_sources()
        .iter()
        .map(|source| SourceView::from_source(source, args.properties))
        .collect();

    if output.is_json() {
        return output.json(&ResolveView {
            manifest: manifest.display().to_string(),
            sources,
            report: &report,
        });
    }

    output.header("Property sources (highest precedence first):")?;
    for (position, source) in sources.iter().enumerate() {
        print_source(&output, &format!("{:>3}.", position + 1), source, 0)?;
    }

    for skipped in &report.skipped {
        output.warning(&format!("skipped {}: {}", skipped.location, skipped.reason))?;
    }
    output.success(&format!(
        "{} descriptor(s) from {} unit(s) loaded into {} source(s)",
        report.descriptors,
        report.units.len(),
        sources.len()
    ))?;
    Ok(())
}

fn print_source(
    output: &OutputManager,
    marker: &str,
    source: &SourceView,
    depth: usize,
) -> CliResult<()> {
    let indent = "      ".repeat(depth);
    let line = match &source.resource {
        Some(resource) if resource != &source.name => {
            format!("{indent}{marker} {}  {}", source.name, output.muted(resource))
        }
        _ => format!("{indent}{marker} {}", source.name),
    };
    output.value(&line)?;

    if let Some(properties) = &source.properties {
        for (key, value) in properties {
            output.value(&format!("{indent}       {key} = {value}"))?;
        }
    }
    for member in &source.members {
        print_source(output, "  \u{2514}", member, depth + 1)?; // └
    }
    Ok(())
}
