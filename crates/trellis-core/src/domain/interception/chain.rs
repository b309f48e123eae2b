use std::fmt;
use std::sync::Arc;

use super::{InvocationResult, MethodInvocation};

/// Order value for interceptors that must run first.
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// Lowest explicit order value. Still ahead of interceptors with no order.
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;

/// Cross-cutting behavior wrapped around a method call.
///
/// Implementations call [`MethodInvocation::proceed`] to continue down the
/// chain. Not calling it short-circuits: the returned value or error becomes
/// the result and nothing downstream runs.
pub trait MethodInterceptor: Send + Sync {
    fn name(&self) -> &str;

    /// Declared precedence; lower runs earlier. `None` sorts last.
    fn order(&self) -> Option<i32> {
        None
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult;
}

/// Selects which methods a registration applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MethodMatcher {
    #[default]
    Any,
    Named(Vec<String>),
    Prefix(String),
}

impl MethodMatcher {
    pub fn named<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(methods.into_iter().map(Into::into).collect())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn matches(&self, method: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(methods) => methods.iter().any(|m| m == method),
            Self::Prefix(prefix) => method.starts_with(prefix.as_str()),
        }
    }
}

/// An interceptor registration: the interceptor, its effective order and
/// the methods it applies to.
#[derive(Clone)]
pub struct Advisor {
    interceptor: Arc<dyn MethodInterceptor>,
    order: Option<i32>,
    matcher: MethodMatcher,
}

impl Advisor {
    pub fn new(interceptor: Arc<dyn MethodInterceptor>) -> Self {
        let order = interceptor.order();
        Self {
            interceptor,
            order,
            matcher: MethodMatcher::Any,
        }
    }

    /// Override the interceptor's declared order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_matcher(mut self, matcher: MethodMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn interceptor(&self) -> &Arc<dyn MethodInterceptor> {
        &self.interceptor
    }

    pub fn order(&self) -> Option<i32> {
        self.order
    }

    pub fn matcher(&self) -> &MethodMatcher {
        &self.matcher
    }
}

impl fmt::Debug for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advisor")
            .field("interceptor", &self.interceptor.name())
            .field("order", &self.order)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Interceptors in execution order. Frozen once built.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    advisors: Vec<Advisor>,
}

impl InterceptorChain {
    /// Sort `advisors` by precedence. Equal orders keep registration order.
    pub fn new(mut advisors: Vec<Advisor>) -> Self {
        advisors.sort_by_key(|advisor| (advisor.order.is_none(), advisor.order));
        Self { advisors }
    }

    pub fn builder() -> InterceptorChainBuilder {
        InterceptorChainBuilder::default()
    }

    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    /// Interceptor names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.advisors.iter().map(|a| a.interceptor.name()).collect()
    }

    /// Interceptors that apply to `method`, in execution order.
    pub fn interceptors_for(&self, method: &str) -> Vec<Arc<dyn MethodInterceptor>> {
        self.advisors
            .iter()
            .filter(|advisor| advisor.matcher.matches(method))
            .map(|advisor| Arc::clone(&advisor.interceptor))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct InterceptorChainBuilder {
    advisors: Vec<Advisor>,
}

impl InterceptorChainBuilder {
    pub fn interceptor(mut self, interceptor: Arc<dyn MethodInterceptor>) -> Self {
        self.advisors.push(Advisor::new(interceptor));
        self
    }

    pub fn advisor(mut self, advisor: Advisor) -> Self {
        self.advisors.push(advisor);
        self
    }

    pub fn build(self) -> InterceptorChain {
        InterceptorChain::new(self.advisors)
    }
}
