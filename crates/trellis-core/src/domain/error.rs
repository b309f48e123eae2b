// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside `TrellisError`)
/// - Categorizable (configuration vs. resource resolution decides whether
///   `ignore_resource_not_found` may swallow them)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (fatal, never retried)
    // ========================================================================
    #[error("Property source descriptor '{descriptor}' declares no locations")]
    EmptyLocations { descriptor: String },

    #[error("Invalid property source descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid configuration unit: {0}")]
    InvalidConfigurationUnit(String),

    #[error("Unsupported encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },

    #[error("Resource {resource} is not valid {encoding} text: {reason}")]
    MalformedResource {
        resource: String,
        encoding: String,
        reason: String,
    },

    // ========================================================================
    // Resource Resolution Errors (skippable with ignore_resource_not_found)
    // ========================================================================
    #[error("Could not resolve placeholder '{placeholder}' in value \"{value}\"")]
    UnresolvablePlaceholder { placeholder: String, value: String },

    #[error("Circular placeholder reference '{placeholder}' in property definitions")]
    CircularPlaceholder { placeholder: String },

    // ========================================================================
    // Chain Manipulation
    // ========================================================================
    #[error("Property source named '{name}' does not exist")]
    UnknownPropertySource { name: String },

    #[error("Property source named '{name}' cannot be added relative to itself")]
    SelfRelativeAddition { name: String },

    // ========================================================================
    // Lookups
    // ========================================================================
    #[error("Required key '{key}' not found")]
    MissingRequiredProperty { key: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyLocations { descriptor } => vec![
                format!("Descriptor '{}' must name at least one location", descriptor),
                "Add a `locations = [\"classpath:app.properties\"]` entry".into(),
            ],
            Self::UnsupportedEncoding { encoding } => vec![
                format!("'{}' is not a supported encoding", encoding),
                "Supported encodings: UTF-8, ISO-8859-1, US-ASCII".into(),
            ],
            Self::UnresolvablePlaceholder { placeholder, .. } => vec![
                format!("Define '{}' in an earlier property source", placeholder),
                format!("Or provide a default: ${{{}:default}}", placeholder),
                "Or set ignore_resource_not_found = true on the descriptor".into(),
            ],
            Self::CircularPlaceholder { placeholder } => vec![
                format!("'{}' refers back to itself through other keys", placeholder),
                "Break the cycle by giving one of the keys a literal value".into(),
            ],
            Self::MissingRequiredProperty { key } => vec![
                format!("No property source defines '{}'", key),
                "Run `trellis resolve` to inspect the property source chain".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling and ignore-flag handling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyLocations { .. }
            | Self::InvalidDescriptor(_)
            | Self::InvalidConfigurationUnit(_)
            | Self::UnsupportedEncoding { .. }
            | Self::MalformedResource { .. } => ErrorCategory::Configuration,
            Self::UnresolvablePlaceholder { .. } | Self::CircularPlaceholder { .. } => {
                ErrorCategory::ResourceResolution
            }
            Self::UnknownPropertySource { .. } | Self::SelfRelativeAddition { .. } => {
                ErrorCategory::Validation
            }
            Self::MissingRequiredProperty { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    ResourceResolution,
    NotFound,
    Internal,
}
