use std::collections::HashMap;

use tracing::debug;

use crate::domain::interception::{
    InvocationError, InvocationResult, MethodInterceptor, MethodInvocation, Value,
};

/// A declarative rule on an argument or on the return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Argument at `index` must be present and not null.
    Required { index: usize },
    /// Argument at `index` must be a string with non-whitespace content.
    NotBlank { index: usize },
    /// Argument at `index` must be a number within `min..=max`.
    Range { index: usize, min: f64, max: f64 },
    /// Argument at `index` must be a string of at most `max` characters.
    MaxLength { index: usize, max: usize },
    /// The return value must not be null.
    ReturnNotNull,
}

impl Constraint {
    fn check_argument(&self, arguments: &[Value]) -> Option<String> {
        let argument = |index: usize| arguments.get(index).filter(|v| !v.is_null());
        match *self {
            Self::Required { index } => argument(index)
                .is_none()
                .then(|| format!("argument {index} is required")),
            Self::NotBlank { index } => match argument(index).and_then(Value::as_str) {
                Some(text) if !text.trim().is_empty() => None,
                _ => Some(format!("argument {index} must not be blank")),
            },
            Self::Range { index, min, max } => match argument(index).and_then(Value::as_f64) {
                Some(number) if (min..=max).contains(&number) => None,
                Some(number) => Some(format!(
                    "argument {index} must be between {min} and {max}, was {number}"
                )),
                None => Some(format!("argument {index} must be a number")),
            },
            Self::MaxLength { index, max } => match argument(index).and_then(Value::as_str) {
                Some(text) if text.chars().count() <= max => None,
                Some(_) => Some(format!("argument {index} must be at most {max} characters")),
                None => None,
            },
            Self::ReturnNotNull => None,
        }
    }

    fn check_return(&self, value: &Value) -> Option<String> {
        match self {
            Self::ReturnNotNull if value.is_null() => Some("return value must not be null".into()),
            _ => None,
        }
    }
}

/// Checks argument constraints before the call and return-value
/// constraints after it.
#[derive(Debug, Clone, Default)]
pub struct ValidationInterceptor {
    order: Option<i32>,
    constraints: HashMap<String, Vec<Constraint>>,
}

impl ValidationInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn constraint(mut self, method: impl Into<String>, constraint: Constraint) -> Self {
        self.constraints.entry(method.into()).or_default().push(constraint);
        self
    }

    fn violation(method: &str, violations: Vec<String>) -> InvocationResult {
        debug!(method, ?violations, "Constraint violation");
        Err(InvocationError::Validation {
            method: method.to_string(),
            violations,
        })
    }
}

impl MethodInterceptor for ValidationInterceptor {
    fn name(&self) -> &str {
        "validation"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let Some(constraints) = self.constraints.get(invocation.method()) else {
            return invocation.proceed();
        };

        let violations: Vec<String> = constraints
            .iter()
            .filter_map(|c| c.check_argument(invocation.arguments()))
            .collect();
        if !violations.is_empty() {
            return Self::violation(invocation.method(), violations);
        }

        let value = invocation.proceed()?;

        let violations: Vec<String> = constraints
            .iter()
            .filter_map(|c| c.check_return(&value))
            .collect();
        if !violations.is_empty() {
            return Self::violation(invocation.method(), violations);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn range_accepts_bounds() {
        let constraint = Constraint::Range {
            index: 0,
            min: 1.0,
            max: 10.0,
        };
        assert_eq!(constraint.check_argument(&[json!(1)]), None);
        assert_eq!(constraint.check_argument(&[json!(10.0)]), None);
        assert!(constraint.check_argument(&[json!(11)]).is_some());
        assert!(constraint.check_argument(&[json!("x")]).is_some());
    }

    #[test]
    fn not_blank_rejects_whitespace_and_null() {
        let constraint = Constraint::NotBlank { index: 1 };
        assert!(constraint.check_argument(&[json!("a"), json!("  ")]).is_some());
        assert!(constraint.check_argument(&[json!("a"), Value::Null]).is_some());
        assert_eq!(constraint.check_argument(&[json!("a"), json!("b")]), None);
    }

    #[test]
    fn max_length_counts_characters() {
        let constraint = Constraint::MaxLength { index: 0, max: 3 };
        assert_eq!(constraint.check_argument(&[json!("äöü")]), None);
        assert!(constraint.check_argument(&[json!("abcd")]).is_some());
    }
}
