//! Ordered method interception.
//!
//! A [`Proxy`] binds an [`Invocable`] target to an [`InterceptorChain`]. Each
//! call walks the chain through a [`MethodInvocation`] cursor; the target is
//! the innermost link.

mod chain;
mod error;
mod invocable;
mod invocation;
mod proxy;

pub use chain::{
    Advisor, HIGHEST_PRECEDENCE, InterceptorChain, InterceptorChainBuilder, LOWEST_PRECEDENCE,
    MethodInterceptor, MethodMatcher,
};
pub use error::InvocationError;
pub use invocable::{Invocable, MethodTable, MethodTableBuilder};
pub use invocation::{InvocationState, MethodInvocation};
pub use proxy::{Proxy, ProxyFactory};

/// Arguments and return values crossing the invocation boundary.
pub type Value = serde_json::Value;

pub type InvocationResult = Result<Value, InvocationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        order: Option<i32>,
        journal: Journal,
    }

    impl Recording {
        fn new(name: &'static str, order: Option<i32>, journal: &Journal) -> Arc<Self> {
            Arc::new(Self {
                name,
                order,
                journal: Arc::clone(journal),
            })
        }
    }

    impl MethodInterceptor for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn order(&self) -> Option<i32> {
            self.order
        }

        fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
            self.journal.lock().unwrap().push(format!("enter {}", self.name));
            let result = invocation.proceed();
            self.journal.lock().unwrap().push(format!("exit {}", self.name));
            result
        }
    }

    struct ShortCircuit;

    impl MethodInterceptor for ShortCircuit {
        fn name(&self) -> &str {
            "short-circuit"
        }

        fn invoke(&self, _invocation: &mut MethodInvocation<'_>) -> InvocationResult {
            Ok(json!("cached"))
        }
    }

    struct Translating;

    impl MethodInterceptor for Translating {
        fn name(&self) -> &str {
            "translating"
        }

        fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
            invocation.proceed().map_err(|err| match err {
                InvocationError::Validation { .. } => {
                    InvocationError::translated("IllegalArgument", err.to_string())
                }
                other => other,
            })
        }
    }

    struct CallTwice;

    impl MethodInterceptor for CallTwice {
        fn name(&self) -> &str {
            "call-twice"
        }

        fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
            let first = invocation.proceed()?;
            let second = invocation.proceed()?;
            Ok(json!([first, second]))
        }
    }

    fn target(journal: &Journal) -> Arc<dyn Invocable> {
        let journal = Arc::clone(journal);
        Arc::new(
            MethodTable::builder("Greeter")
                .method("greet", move |args| {
                    journal.lock().unwrap().push("target".into());
                    let name = args.first().and_then(Value::as_str).unwrap_or("world");
                    Ok(json!(format!("hello {name}")))
                })
                .method("reject", |_| {
                    Err(InvocationError::Validation {
                        method: "reject".into(),
                        violations: vec!["name must not be blank".into()],
                    })
                })
                .build(),
        )
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_chain_runs_by_precedence_and_unwinds_in_reverse() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_interceptor(Recording::new("none", None, &journal))
            .add_interceptor(Recording::new("validation", Some(2), &journal))
            .add_interceptor(Recording::new("logging", Some(1), &journal))
            .get_proxy();

        let result = proxy.call("greet", vec![json!("ada")]).unwrap();

        assert_eq!(result, json!("hello ada"));
        assert_eq!(
            *journal.lock().unwrap(),
            vec![
                "enter logging",
                "enter validation",
                "enter none",
                "target",
                "exit none",
                "exit validation",
                "exit logging",
            ]
        );
    }

    #[test]
    fn test_equal_precedence_keeps_registration_order() {
        let journal = journal();
        let chain = InterceptorChain::builder()
            .interceptor(Recording::new("first", Some(5), &journal))
            .interceptor(Recording::new("unordered", None, &journal))
            .interceptor(Recording::new("second", Some(5), &journal))
            .interceptor(Recording::new("earliest", Some(HIGHEST_PRECEDENCE), &journal))
            .build();

        assert_eq!(
            chain.names(),
            vec!["earliest", "first", "second", "unordered"]
        );
    }

    #[test]
    fn test_short_circuit_skips_downstream_and_target() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_advisor(Advisor::new(Arc::new(ShortCircuit)).with_order(1))
            .add_interceptor(Recording::new("downstream", Some(2), &journal))
            .get_proxy();

        let result = proxy.call("greet", vec![]).unwrap();

        assert_eq!(result, json!("cached"));
        assert!(journal.lock().unwrap().is_empty());
    }

    #[test]
    fn test_translation_hides_original_error() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_interceptor(Arc::new(Translating))
            .get_proxy();

        let err = proxy.call("reject", vec![]).unwrap_err();

        assert!(!err.is_validation());
        assert!(matches!(
            err,
            InvocationError::Translated { ref kind, .. } if kind == "IllegalArgument"
        ));
    }

    #[test]
    fn test_errors_propagate_unchanged_without_translation() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_interceptor(Recording::new("logging", Some(1), &journal))
            .get_proxy();

        let err = proxy.call("reject", vec![]).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["enter logging", "exit logging"]
        );
    }

    #[test]
    fn test_unknown_method_is_reported() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal)).get_proxy();

        let err = proxy.call("missing", vec![]).unwrap_err();

        assert_eq!(
            err,
            InvocationError::NoSuchMethod {
                target: "Greeter".into(),
                method: "missing".into(),
            }
        );
    }

    #[test]
    fn test_proceed_twice_reruns_downstream() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_advisor(Advisor::new(Arc::new(CallTwice)).with_order(1))
            .add_interceptor(Recording::new("inner", Some(2), &journal))
            .get_proxy();

        let result = proxy.call("greet", vec![json!("bo")]).unwrap();

        assert_eq!(result, json!(["hello bo", "hello bo"]));
        assert_eq!(journal.lock().unwrap().len(), 6);
    }

    #[test]
    fn test_matcher_limits_interceptors_to_selected_methods() {
        let journal = journal();
        let proxy = ProxyFactory::new(target(&journal))
            .add_advisor(
                Advisor::new(Recording::new("only-reject", Some(1), &journal))
                    .with_matcher(MethodMatcher::named(["reject"])),
            )
            .get_proxy();

        proxy.call("greet", vec![]).unwrap();

        assert_eq!(*journal.lock().unwrap(), vec!["target"]);
        assert!(MethodMatcher::prefix("get").matches("get_user"));
        assert!(!MethodMatcher::prefix("get").matches("set_user"));
    }

    #[test]
    fn test_invocation_state_machine() {
        let journal = journal();
        let target = target(&journal);
        let interceptors: Vec<Arc<dyn MethodInterceptor>> = Vec::new();
        let mut invocation =
            MethodInvocation::new("greet", target.as_ref(), vec![json!("cy")], &interceptors);
        assert_eq!(invocation.state(), InvocationState::Created);

        invocation.execute().unwrap();
        assert_eq!(invocation.state(), InvocationState::Succeeded);

        let err = invocation.proceed().unwrap_err();
        assert!(matches!(err, InvocationError::IllegalState(_)));
    }

    #[test]
    fn test_failed_invocation_records_failure() {
        let journal = journal();
        let target = target(&journal);
        let interceptors: Vec<Arc<dyn MethodInterceptor>> = Vec::new();
        let mut invocation = MethodInvocation::new("reject", target.as_ref(), vec![], &interceptors);

        assert!(invocation.execute().is_err());
        assert_eq!(invocation.state(), InvocationState::Failed);
    }

    #[test]
    fn test_proxies_nest() {
        let journal = journal();
        let inner = ProxyFactory::new(target(&journal))
            .add_interceptor(Recording::new("inner", Some(1), &journal))
            .get_proxy();
        let outer = ProxyFactory::new(Arc::new(inner))
            .add_interceptor(Recording::new("outer", Some(1), &journal))
            .get_proxy();

        outer.call("greet", vec![]).unwrap();

        assert_eq!(outer.type_name(), "Greeter");
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["enter outer", "enter inner", "target", "exit inner", "exit outer"]
        );
    }
}
