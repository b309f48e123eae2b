use std::fmt;
use std::sync::Arc;

use super::{
    Advisor, InterceptorChain, Invocable, InvocationResult, MethodInterceptor, MethodInvocation,
    Value,
};

/// A target bound to an interceptor chain.
///
/// Each call builds its own [`MethodInvocation`], so concurrent calls share
/// nothing but the immutable chain.
#[derive(Clone)]
pub struct Proxy {
    target: Arc<dyn Invocable>,
    chain: Arc<InterceptorChain>,
}

impl Proxy {
    pub fn new(target: Arc<dyn Invocable>, chain: Arc<InterceptorChain>) -> Self {
        Self { target, chain }
    }

    /// Dispatch `method` through the interceptors that match it.
    pub fn call(&self, method: &str, arguments: Vec<Value>) -> InvocationResult {
        let interceptors = self.chain.interceptors_for(method);
        MethodInvocation::new(method, self.target.as_ref(), arguments, &interceptors).execute()
    }

    pub fn target(&self) -> &Arc<dyn Invocable> {
        &self.target
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }
}

impl Invocable for Proxy {
    fn type_name(&self) -> &str {
        self.target.type_name()
    }

    fn invoke(&self, method: &str, arguments: &[Value]) -> InvocationResult {
        self.call(method, arguments.to_vec())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("target", &self.target.type_name())
            .field("chain", &self.chain.names())
            .finish()
    }
}

/// Collects registrations for one target and freezes them into a [`Proxy`].
pub struct ProxyFactory {
    target: Arc<dyn Invocable>,
    advisors: Vec<Advisor>,
}

impl ProxyFactory {
    pub fn new(target: Arc<dyn Invocable>) -> Self {
        Self {
            target,
            advisors: Vec::new(),
        }
    }

    pub fn add_interceptor(mut self, interceptor: Arc<dyn MethodInterceptor>) -> Self {
        self.advisors.push(Advisor::new(interceptor));
        self
    }

    pub fn add_advisor(mut self, advisor: Advisor) -> Self {
        self.advisors.push(advisor);
        self
    }

    pub fn get_proxy(self) -> Proxy {
        Proxy::new(self.target, Arc::new(InterceptorChain::new(self.advisors)))
    }
}
