use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::interception::{
    InvocationError, InvocationResult, MethodInterceptor, MethodInvocation,
};

/// Rewrites an error into another one, or declines with `None`.
pub trait ErrorTranslator: Send + Sync {
    fn translate(&self, error: &InvocationError) -> Option<InvocationError>;
}

impl<F> ErrorTranslator for F
where
    F: Fn(&InvocationError) -> Option<InvocationError> + Send + Sync,
{
    fn translate(&self, error: &InvocationError) -> Option<InvocationError> {
        self(error)
    }
}

/// Passes failures through its translators; the first one that answers
/// wins. Untranslated errors propagate unchanged.
#[derive(Clone, Default)]
pub struct ExceptionTranslationInterceptor {
    order: Option<i32>,
    translators: Vec<Arc<dyn ErrorTranslator>>,
}

impl ExceptionTranslationInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn ErrorTranslator>) -> Self {
        self.translators.push(translator);
        self
    }

    /// Translate validation failures into `kind` errors.
    pub fn translate_validation(self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.translator(Arc::new(move |error: &InvocationError| match error {
            InvocationError::Validation { .. } => {
                Some(InvocationError::translated(kind.clone(), error.to_string()))
            }
            _ => None,
        }))
    }
}

impl MethodInterceptor for ExceptionTranslationInterceptor {
    fn name(&self) -> &str {
        "exception-translation"
    }

    fn order(&self) -> Option<i32> {
        self.order
    }

    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        invocation.proceed().map_err(|error| {
            match self.translators.iter().find_map(|t| t.translate(&error)) {
                Some(translated) => {
                    debug!(original = %error, translated = %translated, "Translated failure");
                    translated
                }
                None => error,
            }
        })
    }
}

impl fmt::Debug for ExceptionTranslationInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionTranslationInterceptor")
            .field("order", &self.order)
            .field("translators", &self.translators.len())
            .finish()
    }
}
