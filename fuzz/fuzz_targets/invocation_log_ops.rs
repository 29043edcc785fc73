#![no_main]

use libfuzzer_sys::fuzz_target;
use mock_dispatch::{Invocation, InvocationLog, MethodDescriptor, ProxyType, TypeDescriptor, Value};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let log = InvocationLog::default();
    let mut expected = 0usize;

    for byte in data {
        match byte % 4 {
            0 | 1 => {
                log.add(Arc::new(Invocation::new(
                    MethodDescriptor::new("Op", TypeDescriptor::Void)
                        .with_parameters(vec![TypeDescriptor::Int]),
                    vec![Value::Int(i64::from(*byte))],
                    ProxyType::new("IFuzz"),
                )));
                expected += 1;
            }
            2 => {
                let index = usize::from(byte / 4);
                assert_eq!(log.get(index).is_ok(), index < expected);
            }
            _ if byte % 32 == 3 => {
                log.clear();
                expected = 0;
            }
            _ => {
                assert_eq!(log.iter().count(), expected);
            }
        }
        assert_eq!(log.count(), expected);
    }
});
