//! Reflection-free method dispatch.
//!
//! Targets expose their methods through [`Invocable`]. [`MethodTable`] is an
//! explicit delegation table built at startup, mapping method names to
//! handlers. Handlers may capture shared state, which binds the table to an
//! instance; tables without captured state play the role of static methods.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{InvocationError, InvocationResult, Value};

/// Capability to invoke a method by name.
pub trait Invocable: Send + Sync {
    /// Name used in logs and errors.
    fn type_name(&self) -> &str;

    fn invoke(&self, method: &str, arguments: &[Value]) -> InvocationResult;
}

impl<T: Invocable + ?Sized> Invocable for Arc<T> {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> InvocationResult {
        (**self).invoke(method, arguments)
    }
}

type Handler = Arc<dyn Fn(&[Value]) -> InvocationResult + Send + Sync>;

/// Name-to-handler delegation table.
#[derive(Clone)]
pub struct MethodTable {
    type_name: String,
    handlers: HashMap<String, Handler>,
}

impl MethodTable {
    pub fn builder(type_name: impl Into<String>) -> MethodTableBuilder {
        MethodTableBuilder {
            type_name: type_name.into(),
            handlers: HashMap::new(),
        }
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Invocable for MethodTable {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> InvocationResult {
        match self.handlers.get(method) {
            Some(handler) => handler(arguments),
            None => Err(InvocationError::NoSuchMethod {
                target: self.type_name.clone(),
                method: method.into(),
            }),
        }
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("type_name", &self.type_name)
            .field("methods", &self.method_names())
            .finish()
    }
}

pub struct MethodTableBuilder {
    type_name: String,
    handlers: HashMap<String, Handler>,
}

impl MethodTableBuilder {
    /// Register `handler` under `name`, replacing any earlier registration.
    pub fn method<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> InvocationResult + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn build(self) -> MethodTable {
        MethodTable {
            type_name: self.type_name,
            handlers: self.handlers,
        }
    }
}
