use std::fmt;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::trace;

use crate::domain::interception::{
    InvocationResult, MethodInterceptor, MethodInvocation, Value,
};

/// Default number of memoized results.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Memoizes successful results by method and arguments.
///
/// A hit short-circuits the chain. Failures are never cached. Entries are
/// evicted least-recently-used once `max_capacity` is reached, and expire
/// after the optional time to live.
pub struct CacheInterceptor {
    order: Option<i32>,
    max_capacity: u64,
    time_to_live: Option<Duration>,
    entries: Cache<String, Value>,
}

impl CacheInterceptor {
    pub fn new() -> Self {
        Self {
            order: None,
            max_capacity: DEFAULT_CACHE_CAPACITY,
            time_to_live: None,
            entries: Self::build(DEFAULT_CACHE_CAPACITY, None),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self.entries = Self::build(max_capacity, self.time_to_live);
        self
    }

    pub fn with_time_to_live(mut self, time_to_live: Duration) -> Self {
        self.time_to_live = Some(time_to_live);
        self.entries = Self::build(self.max_capacity, Some(time_to_live));
        self
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// Number of live entries, after pending evictions are applied.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    fn build(max_capacity: u64, time_to_live: Option<Duration>) -> Cache<String, Value> {
        let builder = Cache::builder()
            .max_capacity(max_capacity)
            .eviction_policy(EvictionPolicy::lru());
        match time_to_live {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        }
    }

    fn key(invocation: &MethodInvocation<'_>) -> String {
        format!(
            "{}.{}{}",
            invocation.target_type(),
            invocation.method(),
            Value::Array(invocation.arguments().to_vec())
        )
    }
}

impl Default for CacheInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInterceptor")
            .field("order", &self.order)
            .field("max_capacity", &self.max_capacity)
            .field("time_to_live", &self.time_to_live)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl MethodInterceptor for CacheInterceptor {
    fn name(&self) -> &str {
        "cache"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let key = Self::key(invocation);
        if let Some(value) = self.entries.get(&key) {
            trace!(key = %key, "Cache hit");
            return Ok(value);
        }

        let value = invocation.proceed()?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }
}
