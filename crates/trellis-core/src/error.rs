//! Unified error handling for Trellis Core.
//!
//! This module provides a unified error type that wraps domain, application
//! and invocation errors, with categories and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::domain::interception::InvocationError;

/// Root error type for Trellis Core operations.
#[derive(Debug, Error, Clone)]
pub enum TrellisError {
    /// Errors from the domain layer (invariant violations, placeholders).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (resources, factories).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Errors raised by a proxied call or one of its interceptors.
    #[error("Invocation error: {0}")]
    Invocation(#[from] InvocationError),
}

impl TrellisError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Invocation(e) => vec![
                format!("The proxied call failed: {}", e),
                "Run with -vv to see the interceptor trace".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::ResourceResolution => {
                    ErrorCategory::ResourceResolution
                }
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Invocation(_) => ErrorCategory::Invocation,
        }
    }

    /// `true` for the errors a descriptor's `ignore_resource_not_found`
    /// flag is allowed to swallow.
    pub fn is_resource_resolution(&self) -> bool {
        self.category() == ErrorCategory::ResourceResolution
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    ResourceResolution,
    NotFound,
    Invocation,
    Internal,
}

/// Convenient result type alias.
pub type TrellisResult<T> = Result<T, TrellisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_locations_is_configuration() {
        let err: TrellisError = DomainError::EmptyLocations {
            descriptor: "app".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_resource_resolution());
    }

    #[test]
    fn missing_resource_is_resource_resolution() {
        let err: TrellisError = ApplicationError::ResourceNotFound {
            location: "file:missing.properties".into(),
            reason: "no such file".into(),
        }
        .into();
        assert!(err.is_resource_resolution());
    }

    #[test]
    fn unresolvable_placeholder_is_resource_resolution() {
        let err: TrellisError = DomainError::UnresolvablePlaceholder {
            placeholder: "env".into(),
            value: "${env}/app.properties".into(),
        }
        .into();
        assert!(err.is_resource_resolution());
    }

    #[test]
    fn unknown_factory_is_not_ignorable() {
        let err: TrellisError = ApplicationError::UnknownFactory {
            name: "yaml".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_resource_resolution());
    }

    #[test]
    fn poisoned_lock_is_internal() {
        let err: TrellisError = ApplicationError::LockPoisoned { what: "resources" }.into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(!err.suggestions().is_empty());
    }
}
