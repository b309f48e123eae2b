use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    application::ports::{TransactionDefinition, TransactionManager},
    domain::interception::{
        InvocationError, InvocationResult, MethodInterceptor, MethodInvocation, Value,
    },
};

/// Invocation attribute holding the id of the transaction a call runs in.
pub const TRANSACTION_ID_ATTRIBUTE: &str = "transaction.id";

/// Wraps each call in a transaction: commit on success, rollback on
/// failure.
///
/// Methods whose name starts with one of the read-only prefixes get a
/// read-only transaction.
#[derive(Clone)]
pub struct TransactionInterceptor {
    order: Option<i32>,
    manager: Arc<dyn TransactionManager>,
    read_only_prefixes: Vec<String>,
}

impl TransactionInterceptor {
    pub fn new(manager: Arc<dyn TransactionManager>) -> Self {
        Self {
            order: None,
            manager,
            read_only_prefixes: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn read_only_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.read_only_prefixes.push(prefix.into());
        self
    }

    fn definition(&self, invocation: &MethodInvocation<'_>) -> TransactionDefinition {
        let definition = TransactionDefinition::new(invocation.to_string());
        let read_only = self
            .read_only_prefixes
            .iter()
            .any(|prefix| invocation.method().starts_with(prefix.as_str()));
        if read_only {
            definition.read_only()
        } else {
            definition
        }
    }

    fn failure(&self, err: impl fmt::Display) -> InvocationError {
        InvocationError::Interceptor {
            interceptor: self.name().to_string(),
            message: err.to_string(),
        }
    }
}

impl MethodInterceptor for TransactionInterceptor {
    fn name(&self) -> &str {
        "transaction"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let definition = self.definition(invocation);
        let status = self
            .manager
            .begin(&definition)
            .map_err(|err| self.failure(err))?;
        debug!(transaction = %status, read_only = definition.read_only, "Transaction started");
        invocation.set_attribute(TRANSACTION_ID_ATTRIBUTE, Value::String(status.id.to_string()));

        match invocation.proceed() {
            Ok(value) => {
                self.manager.commit(&status).map_err(|err| self.failure(err))?;
                debug!(transaction = %status, "Transaction committed");
                Ok(value)
            }
            Err(failure) => {
                // The call's own failure wins over a rollback failure.
                if let Err(err) = self.manager.rollback(&status) {
                    error!(transaction = %status, error = %err, "Rollback failed");
                } else {
                    debug!(transaction = %status, "Transaction rolled back");
                }
                Err(failure)
            }
        }
    }
}

impl fmt::Debug for TransactionInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionInterceptor")
            .field("order", &self.order)
            .field("read_only_prefixes", &self.read_only_prefixes)
            .finish_non_exhaustive()
    }
}
