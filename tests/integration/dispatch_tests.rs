use mock_dispatch::behavior::{Callback, ReturnValue};
use mock_dispatch::value::{Awaitable, AwaitableKind};
use mock_dispatch::{
    Call, ConfiguredSetup, Fault, MethodDescriptor, MockBuilder, MockError, TypeDescriptor, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn foo() -> MethodDescriptor {
    MethodDescriptor::new("Foo", TypeDescriptor::Void)
}

fn bar() -> MethodDescriptor {
    MethodDescriptor::new("Bar", TypeDescriptor::Int).with_parameters(vec![TypeDescriptor::Int])
}

#[test]
fn test_recorded_calls_are_queryable_in_order() {
    let mock = MockBuilder::new("IFoo").build();

    mock.intercept(Call::new(foo(), vec![])).unwrap();
    mock.intercept(Call::new(bar(), vec![Value::Int(1)])).unwrap();
    mock.intercept(Call::new(foo(), vec![])).unwrap();

    let log = mock.invocations();
    assert_eq!(log.count(), 3);

    let foos = log.to_vec_matching(|inv| inv.method().name == "Foo");
    assert_eq!(foos.len(), 2);
    assert!(Arc::ptr_eq(&foos[0], &log.get(0).unwrap()));
    assert!(Arc::ptr_eq(&foos[1], &log.get(2).unwrap()));

    mock.reset_invocations();
    assert_eq!(log.count(), 0);
}

#[test]
fn test_behavior_chain_with_callback_and_return() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mock = MockBuilder::new("IFoo")
        .with_setup(
            ConfiguredSetup::new("Bar")
                .callback(move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                })
                .returns_with(|inv| match inv.arguments() {
                    [Value::Int(n)] => Value::Int(n * 10),
                    _ => Value::Null,
                }),
        )
        .build();

    assert_eq!(
        mock.intercept(Call::new(bar(), vec![Value::Int(4)])).unwrap(),
        Value::Int(40)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_argument_specific_setup_overrides_general_one() {
    let mock = MockBuilder::new("IFoo")
        .with_setup(ConfiguredSetup::new("Bar").returns(1))
        .with_setup(
            ConfiguredSetup::new("Bar")
                .with_arguments(vec![Value::Int(7)])
                .returns(7),
        )
        .build();

    assert_eq!(
        mock.intercept(Call::new(bar(), vec![Value::Int(7)])).unwrap(),
        Value::Int(7)
    );
    assert_eq!(
        mock.intercept(Call::new(bar(), vec![Value::Int(3)])).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn test_custom_behavior_stage() {
    let mock = MockBuilder::new("IFoo")
        .with_setup(
            ConfiguredSetup::new("Bar")
                .then(ReturnValue::new(Value::Int(2)))
                .then(Callback::new(|inv| {
                    if let Some(Value::Int(n)) = inv.return_value() {
                        inv.set_return_value(Value::Int(n + 1));
                    }
                })),
        )
        .build();

    assert_eq!(
        mock.intercept(Call::new(bar(), vec![Value::Int(0)])).unwrap(),
        Value::Int(3)
    );
}

#[test]
fn test_invocation_limit_resets_with_log() {
    let mock = MockBuilder::new("IFoo")
        .with_setup(ConfiguredSetup::new("Foo").at_most(1))
        .build();

    assert!(mock.intercept(Call::new(foo(), vec![])).is_ok());
    assert!(matches!(
        mock.intercept(Call::new(foo(), vec![])),
        Err(MockError::InvocationCountExceeded { limit: 1, .. })
    ));

    mock.reset_invocations();
    assert!(mock.intercept(Call::new(foo(), vec![])).is_ok());
}

#[test]
fn test_failed_dispatch_is_recorded_as_failed() {
    let limited = MockBuilder::new("IFoo")
        .with_setup(ConfiguredSetup::new("Foo").at_most(0))
        .build();
    let caller_saw = limited.intercept(Call::new(foo(), vec![]));
    assert!(matches!(
        caller_saw,
        Err(MockError::InvocationCountExceeded { limit: 0, .. })
    ));
    let recorded = limited.invocations().get(0).unwrap();
    assert!(recorded.result().is_err());
    assert_eq!(
        recorded.exception().map(|fault| fault.kind),
        Some("mock::invocation_count_exceeded".to_string())
    );

    let strict = MockBuilder::new("IFoo").strict().build();
    assert!(matches!(
        strict.intercept(Call::new(bar(), vec![Value::Int(1)])),
        Err(MockError::MissingSetup { .. })
    ));
    let recorded = strict.invocations().get(0).unwrap();
    assert!(recorded.result().is_err());
    assert_eq!(
        recorded.exception().map(|fault| fault.kind),
        Some("mock::missing_setup".to_string())
    );

    let report = strict.invocation_report().unwrap();
    assert!(report.contains("mock::missing_setup"));
}

#[test]
fn test_abstract_member_cannot_call_base() {
    let method = MethodDescriptor::new("Run", TypeDescriptor::Void).abstract_member();
    let mock = MockBuilder::new("IJob")
        .with_base(&method, |_| Ok(Value::Null))
        .with_setup(ConfiguredSetup::new("Run").returns_base())
        .build();

    assert!(matches!(
        mock.intercept(Call::new(method, vec![])),
        Err(MockError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_explicit_implementation_is_recorded() {
    let declared = MethodDescriptor::new("Dispose", TypeDescriptor::Void);
    let concrete = MethodDescriptor::new("IDisposable.Dispose", TypeDescriptor::Void);
    let mock = MockBuilder::new("Resource").build();

    mock.intercept(Call::new(declared, vec![]).with_implementation(concrete))
        .unwrap();

    let recorded = mock.invocations().get(0).unwrap();
    assert_eq!(recorded.method().name, "Dispose");
    assert_eq!(recorded.method_implementation().name, "IDisposable.Dispose");
    assert_eq!(recorded.proxy_type().name, "Resource");
}

#[test]
fn test_async_fault_is_delivered_through_awaitable() {
    let load = MethodDescriptor::new("Load", TypeDescriptor::value_task(TypeDescriptor::Str));
    let mock = MockBuilder::new("IRepo")
        .with_setup(ConfiguredSetup::new("Load").throws_async(Fault::new("Io", "offline")))
        .build();

    let value = mock.intercept(Call::new(load, vec![])).unwrap();
    assert_eq!(
        value,
        Value::Awaitable(Awaitable::faulted(
            AwaitableKind::ValueTask,
            Fault::new("Io", "offline")
        ))
    );
    let recorded = mock.invocations().get(0).unwrap();
    assert!(recorded.exception().is_none());
    assert!(recorded.is_awaitable_converted());
}

#[test]
fn test_throws_async_on_synchronous_method_fails_fast() {
    let mock = MockBuilder::new("IRepo")
        .with_setup(ConfiguredSetup::new("Bar").throws_async(Fault::new("Io", "offline")))
        .build();

    assert!(matches!(
        mock.intercept(Call::new(bar(), vec![Value::Int(1)])),
        Err(MockError::MismatchedShape { .. })
    ));
}

#[test]
fn test_unmatched_async_call_returns_completed_default() {
    let load = MethodDescriptor::new("Count", TypeDescriptor::task(TypeDescriptor::Int));
    let mock = MockBuilder::new("IRepo").build();

    assert_eq!(
        mock.intercept(Call::new(load, vec![])).unwrap(),
        Value::Awaitable(Awaitable::completed(AwaitableKind::Task, Value::Int(0)))
    );
}

#[test]
fn test_matching_setup_is_a_weak_reference() {
    let mock = MockBuilder::new("IFoo").build();
    let setup = mock.setup(ConfiguredSetup::new("Foo"));
    mock.intercept(Call::new(foo(), vec![])).unwrap();

    let recorded = mock.invocations().get(0).unwrap();
    assert!(recorded.matching_setup().is_some());
    assert_eq!(Arc::strong_count(&setup), 2);
    drop(mock);
    assert_eq!(Arc::strong_count(&setup), 1);
    assert!(recorded.matching_setup().is_some());
    drop(setup);
    assert!(recorded.matching_setup().is_none());
}

#[test]
fn test_invocation_report() {
    let mock = MockBuilder::new("IFoo")
        .with_setup(ConfiguredSetup::new("Bar").returns(5))
        .build();
    mock.intercept(Call::new(bar(), vec![Value::Int(1)])).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&mock.invocation_report().unwrap()).unwrap();
    assert_eq!(report[0]["method"], "int Bar(int)");
    assert_eq!(report[0]["return_value"], 5);
    assert_eq!(report[0]["matching_setup"], "Bar(*)");
    assert_eq!(report[0]["verified"], false);
}
