use crate::utils::{type_descriptor, value};
use mock_dispatch::awaitable::StandardAwaitableFactory;
use mock_dispatch::{Invocation, MethodDescriptor, ProxyType, Value};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_default_value_is_accepted_by_its_type(ty in type_descriptor()) {
        prop_assert!(ty.accepts(&ty.default_value()));
    }

    #[test]
    fn test_unset_result_is_type_default(ty in type_descriptor()) {
        let invocation = Invocation::new(
            MethodDescriptor::new("Any", ty.clone()),
            vec![],
            ProxyType::new("IProperty"),
        );
        prop_assert_eq!(invocation.result().unwrap(), ty.default_value());
    }

    #[test]
    fn test_conversion_yields_awaitable_shape(ty in type_descriptor(), v in value()) {
        let invocation = Invocation::new(
            MethodDescriptor::new("Any", ty.clone()),
            vec![],
            ProxyType::new("IProperty"),
        );
        invocation.set_return_value(v);

        match StandardAwaitableFactory::for_type(&ty) {
            Some(factory) => {
                prop_assert!(invocation.convert_result_to_awaitable(&factory).is_ok());
                let converted = invocation.return_value().unwrap_or(Value::Null);
                prop_assert!(ty.accepts(&converted));
            }
            None => prop_assert!(ty.default_value().as_awaitable().is_none()),
        }
    }
}
