use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::interception::{
    InvocationError, InvocationResult, MethodInterceptor, MethodInvocation, Value,
};

/// Invocation attribute holding the current attempt number, starting at 1.
pub const RETRY_ATTEMPT_ATTRIBUTE: &str = "retry.attempt";

type RetryPredicate = Arc<dyn Fn(&InvocationError) -> bool + Send + Sync>;

/// Re-runs the downstream chain on failure with exponential backoff.
///
/// Arguments are restored to their original values before each attempt.
/// Only target failures are retried unless a predicate says otherwise.
#[derive(Clone)]
pub struct RetryInterceptor {
    order: Option<i32>,
    max_attempts: u32,
    delay: Duration,
    retry_on: RetryPredicate,
}

impl RetryInterceptor {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            order: None,
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
            retry_on: Arc::new(|error: &InvocationError| {
                matches!(error, InvocationError::Target { .. })
            }),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Delay before the second attempt; doubles after each further failure.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&InvocationError) -> bool + Send + Sync + 'static,
    {
        self.retry_on = Arc::new(predicate);
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.delay.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

impl MethodInterceptor for RetryInterceptor {
    fn name(&self) -> &str {
        "retry"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let original = invocation.arguments().to_vec();
        let mut attempt: u32 = 1;
        loop {
            invocation.set_attribute(RETRY_ATTEMPT_ATTRIBUTE, Value::from(attempt));
            match invocation.proceed() {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}", invocation, attempt);
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.max_attempts && (self.retry_on)(&err) => {
                    warn!(
                        "{} failed (attempt {}/{}): {}",
                        invocation, attempt, self.max_attempts, err
                    );
                    let pause = self.backoff(attempt);
                    if !pause.is_zero() {
                        thread::sleep(pause);
                    }
                    *invocation.arguments_mut() = original.clone();
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl fmt::Debug for RetryInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryInterceptor")
            .field("order", &self.order)
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let retry = RetryInterceptor::new(4).with_delay(Duration::from_millis(10));
        assert_eq!(retry.backoff(1), Duration::from_millis(10));
        assert_eq!(retry.backoff(2), Duration::from_millis(20));
        assert_eq!(retry.backoff(3), Duration::from_millis(40));
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryInterceptor::new(0).max_attempts, 1);
    }
}
