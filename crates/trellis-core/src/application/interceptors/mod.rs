//! Built-in interceptors.
//!
//! Each one declares no order by default; use `with_order` or an
//! [`Advisor`](crate::domain::interception::Advisor) to position it.

mod cache;
mod logging;
mod retry;
mod transaction;
mod translation;
mod validation;

pub use cache::CacheInterceptor;
pub use logging::LoggingInterceptor;
pub use retry::{RETRY_ATTEMPT_ATTRIBUTE, RetryInterceptor};
pub use transaction::{TRANSACTION_ID_ATTRIBUTE, TransactionInterceptor};
pub use translation::{ErrorTranslator, ExceptionTranslationInterceptor};
pub use validation::{Constraint, ValidationInterceptor};
