use thiserror::Error;

/// Failure raised by a target method or an interceptor.
///
/// The chain never wraps these; whatever the outermost interceptor returns
/// is what the caller sees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvocationError {
    /// The target method itself failed.
    #[error("{target}.{method} failed: {message}")]
    Target {
        target: String,
        method: String,
        message: String,
    },

    /// Arguments or the return value violated declared constraints.
    #[error("Validation failed for {method}: {}", .violations.join("; "))]
    Validation {
        method: String,
        violations: Vec<String>,
    },

    /// The target has no method with this name.
    #[error("No method '{method}' on {target}")]
    NoSuchMethod { target: String, method: String },

    /// An interceptor failed on its own account.
    #[error("Interceptor '{interceptor}' failed: {message}")]
    Interceptor {
        interceptor: String,
        message: String,
    },

    /// An error rewritten by a translating interceptor.
    #[error("{kind}: {message}")]
    Translated { kind: String, message: String },

    /// The invocation was driven outside its state machine.
    #[error("Illegal invocation state: {0}")]
    IllegalState(String),
}

impl InvocationError {
    pub fn target(
        target: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Target {
            target: target.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn translated(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Translated {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
