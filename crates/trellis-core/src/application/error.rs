//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O at the port
//! boundary. Invariant violations are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while loading and merging property sources.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No resource exists at the location.
    #[error("Resource not found at {location}: {reason}")]
    ResourceNotFound { location: String, reason: String },

    /// The resource exists but could not be read.
    #[error("Resource at {location} could not be read: {reason}")]
    ResourceUnreadable { location: String, reason: String },

    /// A descriptor names a factory nobody registered.
    #[error("Unknown property source factory: {name}")]
    UnknownFactory { name: String },

    /// A factory rejected the resource content.
    #[error("Factory '{factory}' failed on {resource}: {reason}")]
    FactoryFailed {
        factory: String,
        resource: String,
        reason: String,
    },

    /// A configuration manifest could not be parsed.
    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest { path: String, reason: String },

    /// Shared state guarded by a lock is unusable.
    #[error("Lock poisoned: {what}")]
    LockPoisoned { what: &'static str },

    /// Transaction manager failure.
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ResourceNotFound { location, .. } => vec![
                format!("Nothing found at: {}", location),
                "Check the path and the classpath: / file: prefix".into(),
                "Set ignore_resource_not_found = true if the file is optional".into(),
            ],
            Self::ResourceUnreadable { location, .. } => vec![
                format!("Failed to read: {}", location),
                "Check that you have read permissions".into(),
            ],
            Self::UnknownFactory { name } => vec![
                format!("No factory registered as '{}'", name),
                "Built-in factories: properties, toml, json, default".into(),
            ],
            Self::FactoryFailed { resource, .. } => vec![
                format!("Fix the syntax of {}", resource),
                "Or pick a factory matching the file format".into(),
            ],
            Self::InvalidManifest { path, .. } => vec![
                format!("Fix the manifest at {}", path),
                "Each [[unit]] needs a name and [[unit.property_source]] entries".into(),
            ],
            Self::LockPoisoned { .. } => vec![
                "A previous operation panicked while holding a lock".into(),
                "Try again in a moment".into(),
            ],
            Self::Transaction(_) => vec!["Check the transaction manager state".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ResourceNotFound { .. } | Self::ResourceUnreadable { .. } => {
                ErrorCategory::ResourceResolution
            }
            Self::UnknownFactory { .. }
            | Self::FactoryFailed { .. }
            | Self::InvalidManifest { .. } => ErrorCategory::Configuration,
            Self::LockPoisoned { .. } | Self::Transaction(_) => ErrorCategory::Internal,
        }
    }
}
