use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::{Invocable, InvocationError, InvocationResult, MethodInterceptor, Value};

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Created,
    Advancing,
    Succeeded,
    Failed,
}

impl InvocationState {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One in-flight call travelling through an interceptor chain.
///
/// The chain position is an explicit cursor into an immutable interceptor
/// slice. [`proceed`](Self::proceed) hands control to the interceptor under
/// the cursor, or to the target once the cursor is past the last one, and
/// restores the cursor when that call returns. Calling `proceed` twice from
/// the same interceptor therefore re-runs everything downstream.
pub struct MethodInvocation<'a> {
    id: Uuid,
    method: &'a str,
    target: &'a dyn Invocable,
    arguments: Vec<Value>,
    interceptors: &'a [Arc<dyn MethodInterceptor>],
    cursor: usize,
    state: InvocationState,
    attributes: HashMap<String, Value>,
}

impl<'a> MethodInvocation<'a> {
    pub fn new(
        method: &'a str,
        target: &'a dyn Invocable,
        arguments: Vec<Value>,
        interceptors: &'a [Arc<dyn MethodInterceptor>],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            target,
            arguments,
            interceptors,
            cursor: 0,
            state: InvocationState::Created,
            attributes: HashMap::new(),
        }
    }

    /// Run the whole chain from the top and record the outcome.
    pub fn execute(&mut self) -> InvocationResult {
        let result = self.proceed();
        self.complete(&result);
        result
    }

    /// Continue with the next interceptor, or call the target.
    pub fn proceed(&mut self) -> InvocationResult {
        if self.state.is_completed() {
            return Err(InvocationError::IllegalState(format!(
                "proceed() called on completed invocation of {}.{}",
                self.target.type_name(),
                self.method
            )));
        }
        self.state = InvocationState::Advancing;

        let interceptors = self.interceptors;
        match interceptors.get(self.cursor) {
            Some(interceptor) => {
                self.cursor += 1;
                let result = interceptor.invoke(self);
                self.cursor -= 1;
                result
            }
            None => {
                let target = self.target;
                target.invoke(self.method, &self.arguments)
            }
        }
    }

    pub(crate) fn complete(&mut self, result: &InvocationResult) {
        self.state = if result.is_ok() {
            InvocationState::Succeeded
        } else {
            InvocationState::Failed
        };
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn target_type(&self) -> &str {
        self.target.type_name()
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Arguments seen by downstream interceptors and the target.
    pub fn arguments_mut(&mut self) -> &mut Vec<Value> {
        &mut self.arguments
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Zero-based index of the next interceptor `proceed` will run.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

impl fmt::Debug for MethodInvocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvocation")
            .field("id", &self.id)
            .field("target", &self.target.type_name())
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .field("position", &self.cursor)
            .field("chain_len", &self.interceptors.len())
            .field("state", &self.state)
            .finish()
    }
}

impl fmt::Display for MethodInvocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target.type_name(), self.method)
    }
}
