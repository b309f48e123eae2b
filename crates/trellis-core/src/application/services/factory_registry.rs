//! Factory Registry - maps descriptor factory references to implementations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{
    application::{ApplicationError, ports::PropertySourceFactory},
    error::TrellisResult,
};

/// Property source factories by name, plus the one used when a descriptor
/// names none.
#[derive(Clone)]
pub struct FactoryRegistry {
    default: Arc<dyn PropertySourceFactory>,
    named: BTreeMap<String, Arc<dyn PropertySourceFactory>>,
}

impl FactoryRegistry {
    pub fn new(default: Arc<dyn PropertySourceFactory>) -> Self {
        Self {
            default,
            named: BTreeMap::new(),
        }
    }

    /// Register `factory` under `name`, replacing any previous one.
    pub fn register(mut self, name: impl Into<String>, factory: Arc<dyn PropertySourceFactory>) -> Self {
        self.named.insert(name.into(), factory);
        self
    }

    /// The factory for `reference`, or the default for `None`.
    pub fn resolve(&self, reference: Option<&str>) -> TrellisResult<&Arc<dyn PropertySourceFactory>> {
        match reference {
            None => Ok(&self.default),
            Some(name) => self.named.get(name).ok_or_else(|| {
                ApplicationError::UnknownFactory {
                    name: name.to_string(),
                }
                .into()
            }),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.named.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("named", &self.names())
            .finish_non_exhaustive()
    }
}
