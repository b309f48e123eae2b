//! Flags accepted by every `trellis` subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more: `-v` shows units and sources as they load, `-vv` merge
    /// decisions and the interceptor trace, `-vvv` everything.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results and errors.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never color output (also set by `NO_COLOR`).
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Settings file to read instead of the per-user default.
    #[arg(short = 'c', long, global = true, value_name = "FILE", env = "TRELLIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format; falls back to `output.format` in the settings file.
    #[arg(short = 'o', long, global = true, value_enum, value_name = "FORMAT")]
    pub output_format: Option<OutputFormat>,
}

/// How results are rendered on stdout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` when piped.
    #[default]
    Auto,
    /// Colored tree and headers.
    Human,
    /// Same layout, no escape codes.
    Plain,
    /// One pretty JSON document.
    Json,
}

impl OutputFormat {
    /// Pick the format to use: the flag wins over the configured value, and
    /// `auto` is settled by whether stdout is a terminal.
    pub fn resolve(flag: Option<Self>, configured: Self, stdout_is_terminal: bool) -> Self {
        match flag.unwrap_or(configured) {
            Self::Auto if stdout_is_terminal => Self::Human,
            Self::Auto => Self::Plain,
            chosen => chosen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_configured_format() {
        let format = OutputFormat::resolve(Some(OutputFormat::Json), OutputFormat::Plain, true);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn configured_format_applies_without_flag() {
        let format = OutputFormat::resolve(None, OutputFormat::Json, true);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn auto_follows_the_terminal() {
        assert_eq!(
            OutputFormat::resolve(None, OutputFormat::Auto, true),
            OutputFormat::Human
        );
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Auto), OutputFormat::Json, false),
            OutputFormat::Plain
        );
    }
}
