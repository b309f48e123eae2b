use std::time::Instant;

use tracing::{debug, debug_span, warn};

use crate::domain::interception::{InvocationResult, MethodInterceptor, MethodInvocation};

/// Logs entry and exit of every call, with timing.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor {
    order: Option<i32>,
    log_arguments: bool,
}

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Include argument values in the entry event.
    pub fn with_arguments(mut self) -> Self {
        self.log_arguments = true;
        self
    }
}

impl MethodInterceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let span = debug_span!(
            "invocation",
            id = %invocation.id(),
            target_type = invocation.target_type(),
            method = invocation.method(),
        );
        let _guard = span.enter();

        if self.log_arguments {
            debug!(arguments = ?invocation.arguments(), "Entering {}", invocation);
        } else {
            debug!(arguments = invocation.arguments().len(), "Entering {}", invocation);
        }

        let started = Instant::now();
        let result = invocation.proceed();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => debug!(elapsed_ms, "Exiting {}", invocation),
            Err(err) => warn!(elapsed_ms, error = %err, "{} failed", invocation),
        }
        result
    }
}
