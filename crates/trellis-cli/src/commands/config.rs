//! `trellis config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                match &value {
                    serde_json::Value::String(text) => output.value(text)?,
                    other => output.value(&other.to_string())?,
                }
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                return output.json(&config);
            }
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.value(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            output.value(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key in the serialised configuration.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<serde_json::Value> {
    let document = serde_json::to_value(config)?;
    key.split('.')
        .try_fold(&document, |node, segment| node.get(segment))
        .cloned()
        .ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            get_config_value(&cfg, "resolve.manifest").unwrap(),
            json!("trellis.toml")
        );
        assert_eq!(get_config_value(&cfg, "invoke.retry_attempts").unwrap(), json!(3));
    }

    #[test]
    fn get_section_returns_table() {
        let cfg = AppConfig::default();
        let output = get_config_value(&cfg, "output").unwrap();
        assert_eq!(output["no_color"], json!(false));
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
