//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `TRELLIS_*` environment variables, `__` between sections
//!    (`TRELLIS_RESOLVE__MANIFEST=conf/`)
//! 3. Config file (`--config`, or [`AppConfig::config_path`] when present)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "TRELLIS";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output settings.
    pub output: OutputConfig,
    /// Where `resolve` and `get` read property sources from.
    pub resolve: ResolveConfig,
    /// Interceptors applied by `invoke`.
    pub invoke: InvokeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Used when `--output-format` is not given.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Manifest file or directory used when `--manifest` is absent.
    pub manifest: PathBuf,
    /// Add process environment variables as the lowest-precedence source.
    pub system_environment: bool,
    /// Empty lists vanish from the serialised defaults, so this needs its own default.
    #[serde(default)]
    pub classpath_roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeConfig {
    /// Interceptor names, in registration order.
    pub interceptors: Vec<String>,
    pub retry_attempts: u32,
    /// Base retry backoff in milliseconds.
    pub retry_delay_ms: u64,
    /// Most results the cache interceptor keeps before evicting.
    pub cache_capacity: u64,
    /// Seconds a cached result stays valid; 0 keeps it until evicted.
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                no_color: false,
                format: OutputFormat::Auto,
            },
            resolve: ResolveConfig {
                manifest: PathBuf::from("trellis.toml"),
                system_environment: true,
                classpath_roots: Vec::new(),
            },
            invoke: InvokeConfig {
                interceptors: [
                    "logging",
                    "exception-translation",
                    "validation",
                    "cache",
                    "retry",
                    "transaction",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                retry_attempts: 3,
                retry_delay_ms: 0,
                cache_capacity: 1024,
                cache_ttl_secs: 0,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default path is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, ::config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(
        path: &Path,
        required: bool,
        environment: ::config::Environment,
    ) -> anyhow::Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())
            .context("Failed to serialise built-in defaults")?;

        ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                environment
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("invoke.interceptors")
                    .with_list_parse_key("resolve.classpath_roots")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Configuration has an invalid shape")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.trellis.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("rs", "trellis", "trellis")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".trellis.toml"))
    }
}
