//! The demo `Inventory` service behind `trellis invoke`, and the
//! interceptor chain built from configuration.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use trellis_adapters::InMemoryTransactionManager;
use trellis_core::application::interceptors::{
    CacheInterceptor, Constraint, ExceptionTranslationInterceptor, LoggingInterceptor,
    RetryInterceptor, TransactionInterceptor, ValidationInterceptor,
};
use trellis_core::prelude::*;

use crate::config::InvokeConfig;
use crate::error::{CliError, CliResult};

pub const TYPE_NAME: &str = "Inventory";

/// Interceptor names accepted in `invoke.interceptors`.
pub const INTERCEPTORS: [&str; 6] = [
    "logging",
    "exception-translation",
    "validation",
    "cache",
    "retry",
    "transaction",
];

/// Calls `flaky` fails before it succeeds.
const FLAKY_FAILURES: u32 = 2;

/// A proxied service plus the collaborators worth reporting on.
pub struct Demo {
    pub proxy: Proxy,
    pub transactions: InMemoryTransactionManager,
}

/// Build the inventory service with its initial stock.
pub fn inventory() -> MethodTable {
    let stock = Arc::new(Mutex::new(BTreeMap::from([
        ("gadget".to_string(), 3_i64),
        ("widget".to_string(), 12_i64),
    ])));
    let flaky_calls = Arc::new(AtomicU32::new(0));

    let reserve_stock = Arc::clone(&stock);
    MethodTable::builder(TYPE_NAME)
        .method("greet", |args: &[Value]| {
            let name = args.first().and_then(Value::as_str).unwrap_or("world");
            Ok(json!(format!("Hello, {name}!")))
        })
        .method("add", |args: &[Value]| {
            let operand = |index: usize| {
                args.get(index).and_then(Value::as_f64).ok_or_else(|| {
                    InvocationError::target(TYPE_NAME, "add", format!("argument {index} is not a number"))
                })
            };
            let (a, b) = (operand(0)?, operand(1)?);
            match (args[0].as_i64(), args[1].as_i64()) {
                (Some(a), Some(b)) => Ok(json!(a.saturating_add(b))),
                _ => Ok(json!(a + b)),
            }
        })
        .method("get_stock", move |args: &[Value]| {
            let sku = args.first().and_then(Value::as_str).unwrap_or_default();
            let stock = stock.lock().map_err(|_| poisoned("get_stock"))?;
            Ok(stock.get(sku).map_or(Value::Null, |level| json!(level)))
        })
        .method("reserve", move |args: &[Value]| {
            let sku = args.first().and_then(Value::as_str).unwrap_or_default();
            let quantity = args.get(1).and_then(Value::as_i64).unwrap_or(0);
            let mut stock = reserve_stock.lock().map_err(|_| poisoned("reserve"))?;
            let level = stock.get_mut(sku).ok_or_else(|| {
                InvocationError::target(TYPE_NAME, "reserve", format!("unknown sku '{sku}'"))
            })?;
            if *level < quantity {
                return Err(InvocationError::target(
                    TYPE_NAME,
                    "reserve",
                    format!("only {level} '{sku}' left"),
                ));
            }
            *level -= quantity;
            Ok(json!({ "sku": sku, "reserved": quantity, "remaining": *level }))
        })
        .method("flaky", move |_args: &[Value]| {
            let call = flaky_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= FLAKY_FAILURES {
                Err(InvocationError::target(
                    TYPE_NAME,
                    "flaky",
                    format!("transient failure on call {call}"),
                ))
            } else {
                Ok(json!(format!("succeeded on call {call}")))
            }
        })
        .build()
}

fn poisoned(method: &str) -> InvocationError {
    InvocationError::target(TYPE_NAME, method, "stock lock poisoned")
}

fn validation() -> ValidationInterceptor {
    ValidationInterceptor::new()
        .constraint("greet", Constraint::NotBlank { index: 0 })
        .constraint("greet", Constraint::MaxLength { index: 0, max: 64 })
        .constraint("add", Constraint::Required { index: 0 })
        .constraint("add", Constraint::Required { index: 1 })
        .constraint("get_stock", Constraint::NotBlank { index: 0 })
        .constraint("get_stock", Constraint::ReturnNotNull)
        .constraint("reserve", Constraint::NotBlank { index: 0 })
        .constraint(
            "reserve",
            Constraint::Range {
                index: 1,
                min: 1.0,
                max: 100.0,
            },
        )
}

fn cache(config: &InvokeConfig) -> CacheInterceptor {
    let cache = CacheInterceptor::new().with_max_capacity(config.cache_capacity);
    match config.cache_ttl_secs {
        0 => cache,
        secs => cache.with_time_to_live(Duration::from_secs(secs)),
    }
}

/// Build the proxy with the configured interceptors, outermost first.
pub fn build(config: &InvokeConfig) -> CliResult<Demo> {
    let transactions = InMemoryTransactionManager::new();
    let mut factory = ProxyFactory::new(Arc::new(inventory()));

    for name in &config.interceptors {
        let advisor = match name.as_str() {
            "logging" => Advisor::new(Arc::new(LoggingInterceptor::new().with_arguments())),
            "exception-translation" => Advisor::new(Arc::new(
                ExceptionTranslationInterceptor::new().translate_validation("bad_request"),
            )),
            "validation" => Advisor::new(Arc::new(validation())),
            "cache" => Advisor::new(Arc::new(cache(config)))
                .with_matcher(MethodMatcher::prefix("get_")),
            "retry" => Advisor::new(Arc::new(
                RetryInterceptor::new(config.retry_attempts)
                    .with_delay(Duration::from_millis(config.retry_delay_ms)),
            ))
            .with_matcher(MethodMatcher::named(["flaky"])),
            "transaction" => Advisor::new(Arc::new(
                TransactionInterceptor::new(Arc::new(transactions.clone()))
                    .read_only_prefix("get_"),
            ))
            .with_matcher(MethodMatcher::named(["reserve", "get_stock"])),
            other => {
                return Err(CliError::UnknownInterceptor {
                    name: other.to_string(),
                    available: INTERCEPTORS.to_vec(),
                });
            }
        };
        factory = factory.add_advisor(advisor);
    }

    Ok(Demo {
        proxy: factory.get_proxy(),
        transactions,
    })
}

/// Read a command-line argument as JSON, or as a plain string when it is
/// not valid JSON.
pub fn parse_argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use trellis_adapters::transaction::TransactionOutcome;

    fn demo() -> Demo {
        build(&AppConfig::default().invoke).unwrap()
    }

    #[test]
    fn arguments_fall_back_to_strings() {
        assert_eq!(parse_argument("42"), json!(42));
        assert_eq!(parse_argument("[1,2]"), json!([1, 2]));
        assert_eq!(parse_argument("widget"), json!("widget"));
    }

    #[test]
    fn greet_and_add_pass_through_the_chain() {
        let demo = demo();
        assert_eq!(demo.proxy.call("greet", vec![json!("Ada")]).unwrap(), json!("Hello, Ada!"));
        assert_eq!(demo.proxy.call("add", vec![json!(2), json!(40)]).unwrap(), json!(42));
        assert_eq!(demo.proxy.call("add", vec![json!(0.5), json!(1)]).unwrap(), json!(1.5));
    }

    #[test]
    fn blank_name_is_translated_to_bad_request() {
        let err = demo().proxy.call("greet", vec![json!("  ")]).unwrap_err();
        assert!(matches!(err, InvocationError::Translated { ref kind, .. } if kind == "bad_request"));
    }

    #[test]
    fn flaky_succeeds_within_default_retries() {
        let result = demo().proxy.call("flaky", vec![]).unwrap();
        assert_eq!(result, json!("succeeded on call 3"));
    }

    #[test]
    fn flaky_fails_without_retry() {
        let mut config = AppConfig::default().invoke;
        config.interceptors.retain(|name| name != "retry");

        let err = build(&config).unwrap().proxy.call("flaky", vec![]).unwrap_err();

        assert!(matches!(err, InvocationError::Target { .. }));
    }

    #[test]
    fn reserve_commits_and_failure_rolls_back() {
        let demo = demo();

        let ok = demo
            .proxy
            .call("reserve", vec![json!("gadget"), json!(2)])
            .unwrap();
        let err = demo.proxy.call("reserve", vec![json!("gadget"), json!(2)]);

        assert_eq!(ok["remaining"], json!(1));
        assert!(err.is_err());
        let outcomes: Vec<_> = demo
            .transactions
            .history()
            .into_iter()
            .map(|record| record.outcome)
            .collect();
        assert_eq!(
            outcomes,
            vec![
                Some(TransactionOutcome::Committed),
                Some(TransactionOutcome::RolledBack)
            ]
        );
    }

    #[test]
    fn unknown_sku_violates_return_constraint() {
        let err = demo().proxy.call("get_stock", vec![json!("gizmo")]).unwrap_err();
        assert!(matches!(err, InvocationError::Translated { .. }));
    }

    #[test]
    fn unknown_interceptor_is_rejected() {
        let mut config = AppConfig::default().invoke;
        config.interceptors.push("audit".into());

        let err = build(&config).err().unwrap();

        assert_eq!(err.exit_code(), 4);
    }
}
