//! In-memory resource loader for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use trellis_core::{
    application::{ApplicationError, ports::ResourceLoader},
    domain::Resource,
    error::TrellisResult,
};

/// In-memory resources keyed by exact location.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceLoader {
    inner: Arc<RwLock<HashMap<String, Resource>>>,
}

impl InMemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_resource(self, location: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(location, content);
        self
    }

    pub fn insert(&self, location: &str, content: impl Into<Vec<u8>>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(
                location.to_string(),
                Resource::new(location, format!("memory [{location}]"), content),
            );
        }
    }

    pub fn remove(&self, location: &str) -> bool {
        self.inner
            .write()
            .map(|mut inner| inner.remove(location).is_some())
            .unwrap_or(false)
    }

    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self
            .inner
            .read()
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default();
        locations.sort();
        locations
    }
}

impl ResourceLoader for InMemoryResourceLoader {
    fn get_resource(&self, location: &str) -> TrellisResult<Resource> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned {
            what: "in-memory resources",
        })?;
        inner.get(location).cloned().ok_or_else(|| {
            ApplicationError::ResourceNotFound {
                location: location.to_string(),
                reason: "no in-memory resource at this location".into(),
            }
            .into()
        })
    }
}
