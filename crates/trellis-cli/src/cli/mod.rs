//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "trellis",
    bin_name = "trellis",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Resolve layered property sources and drive intercepted calls",
    long_about = "Trellis loads the property sources declared by configuration \
                  units into one ordered environment, and runs method calls \
                  through an ordered interceptor chain.",
    after_help = "EXAMPLES:\n\
        \x20 trellis resolve --manifest trellis.toml\n\
        \x20 trellis get app.name -m conf/ -D profile=prod\n\
        \x20 trellis invoke greet Ada\n\
        \x20 trellis completions bash > /usr/share/bash-completion/completions/trellis",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load every unit and print the resulting property source chain.
    #[command(
        visible_alias = "r",
        about = "Print the resolved property source chain",
        after_help = "EXAMPLES:\n\
            \x20 trellis resolve\n\
            \x20 trellis resolve --manifest conf/ --properties\n\
            \x20 trellis resolve -D profile=prod --output-format json"
    )]
    Resolve(ResolveArgs),

    /// Print one resolved property.
    #[command(
        about = "Print a resolved property value",
        after_help = "EXAMPLES:\n\
            \x20 trellis get server.port\n\
            \x20 trellis get app.greeting --raw\n\
            \x20 trellis get app.name -D app.name=override"
    )]
    Get(GetArgs),

    /// Call a method on the demo service through the interceptor chain.
    #[command(
        about = "Invoke a demo service method through the interceptor chain",
        after_help = "EXAMPLES:\n\
            \x20 trellis invoke greet Ada\n\
            \x20 trellis invoke add 2 40\n\
            \x20 trellis invoke get_stock widget --times 3 -vv\n\
            \x20 trellis invoke reserve widget 5"
    )]
    Invoke(InvokeArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 trellis completions bash > ~/.local/share/bash-completion/completions/trellis\n\
            \x20 trellis completions zsh  > ~/.zfunc/_trellis\n\
            \x20 trellis completions fish > ~/.config/fish/completions/trellis.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the CLI configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 trellis config get resolve.manifest\n\
            \x20 trellis config list\n\
            \x20 trellis config path"
    )]
    Config(ConfigCommands),
}

// ── shared source arguments ───────────────────────────────────────────────────

/// Where property sources come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Manifest file or directory of manifests.
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "PATH",
        help = "Manifest file or directory (default from config)"
    )]
    pub manifest: Option<PathBuf>,

    /// Highest-precedence property definitions.
    #[arg(
        short = 'D',
        long = "define",
        value_name = "KEY=VALUE",
        value_parser = parse_define,
        help = "Define a property ahead of every other source"
    )]
    pub defines: Vec<(String, String)>,

    /// Leave process environment variables out of the chain.
    #[arg(long = "no-system-env", help = "Do not add environment variables as a source")]
    pub no_system_env: bool,

    /// Extra directories searched for `classpath:` locations.
    #[arg(
        long = "classpath-root",
        value_name = "DIR",
        help = "Directory searched for classpath: locations (repeatable)"
    )]
    pub classpath_roots: Vec<PathBuf>,
}

/// Parse `key=value`. The value may be empty; the key may not.
pub fn parse_define(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        Some(_) => Err(format!("missing key in '{raw}'")),
        None => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── resolve ───────────────────────────────────────────────────────────────────

/// Arguments for `trellis resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include every property of every source.
    #[arg(short = 'p', long = "properties", help = "List properties of each source")]
    pub properties: bool,
}

// ── get ───────────────────────────────────────────────────────────────────────

/// Arguments for `trellis get`.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Property key to look up.
    #[arg(value_name = "KEY", help = "Property key")]
    pub key: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the stored value without resolving placeholders.
    #[arg(long = "raw", help = "Do not resolve placeholders in the value")]
    pub raw: bool,
}

// ── invoke ────────────────────────────────────────────────────────────────────

/// Arguments for `trellis invoke`.
#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Method on the demo service.
    #[arg(value_name = "METHOD", help = "Method name")]
    pub method: String,

    /// Arguments; each is read as JSON, falling back to a plain string.
    #[arg(
        value_name = "ARGS",
        allow_negative_numbers = true,
        help = "Method arguments (JSON or plain strings)"
    )]
    pub args: Vec<String>,

    /// Call the method this many times through the same proxy.
    #[arg(
        long = "times",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of calls to make"
    )]
    pub times: u32,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `trellis completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, value_name = "SHELL", help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

/// `trellis config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value.
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the default configuration file path.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
