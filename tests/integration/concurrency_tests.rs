use mock_dispatch::{
    Call, ConfiguredSetup, Invocation, InvocationLog, MethodDescriptor, MockBuilder,
    TypeDescriptor, Value,
};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn tagged(thread: usize, seq: usize) -> Arc<Invocation> {
    Arc::new(Invocation::new(
        MethodDescriptor::new("Tick", TypeDescriptor::Void)
            .with_parameters(vec![TypeDescriptor::Int, TypeDescriptor::Int]),
        vec![Value::Int(thread as i64), Value::Int(seq as i64)],
        mock_dispatch::ProxyType::new("IClock"),
    ))
}

fn tag(invocation: &Invocation) -> (i64, i64) {
    match invocation.arguments() {
        [Value::Int(t), Value::Int(s)] => (*t, *s),
        other => panic!("unexpected arguments {:?}", other),
    }
}

#[test]
fn test_concurrent_adds_are_neither_lost_nor_duplicated() {
    let log = Arc::new(InvocationLog::default());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = log.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for s in 0..PER_THREAD {
                    log.add(tagged(t, s));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(log.count(), THREADS * PER_THREAD);
    let all = log.to_vec();
    let unique: HashSet<(i64, i64)> = all.iter().map(|inv| tag(inv)).collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);

    // Each thread's own appends keep their relative order.
    for t in 0..THREADS as i64 {
        let seqs: Vec<i64> = all
            .iter()
            .map(|inv| tag(inv))
            .filter(|(thread, _)| *thread == t)
            .map(|(_, seq)| seq)
            .collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_snapshots_taken_during_appends_are_consistent() {
    let log = Arc::new(InvocationLog::default());
    let writer_log = log.clone();
    let writer = thread::spawn(move || {
        for s in 0..2_000 {
            writer_log.add(tagged(0, s));
        }
    });

    for _ in 0..200 {
        let snapshot: Vec<Arc<Invocation>> = log.iter().collect();
        // A snapshot is always a prefix of the single writer's sequence.
        for (i, inv) in snapshot.iter().enumerate() {
            assert_eq!(tag(inv), (0, i as i64));
        }
    }
    writer.join().unwrap();
    assert_eq!(log.count(), 2_000);
}

#[test]
fn test_clear_racing_with_adds_leaves_consistent_state() {
    let log = Arc::new(InvocationLog::default());
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = log.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for s in 0..PER_THREAD {
                    log.add(tagged(t, s));
                }
            })
        })
        .collect();

    barrier.wait();
    for _ in 0..20 {
        log.clear();
        // Only this thread clears, so the log can only grow between reads.
        let count = log.count();
        assert!(log.to_vec().len() >= count);
    }
    for handle in handles {
        handle.join().unwrap();
    }

    log.clear();
    assert_eq!(log.count(), 0);
    assert!(log.to_vec().is_empty());
    assert_eq!(log.iter().count(), 0);
}

#[test]
fn test_shared_mock_dispatches_from_many_threads() {
    let mock = Arc::new(
        MockBuilder::new("ICounter")
            .with_setup(ConfiguredSetup::new("Next").returns_with(|inv| {
                match inv.arguments() {
                    [Value::Int(n)] => Value::Int(n + 1),
                    _ => Value::Null,
                }
            }))
            .build(),
    );
    let next =
        MethodDescriptor::new("Next", TypeDescriptor::Int).with_parameters(vec![TypeDescriptor::Int]);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mock = mock.clone();
            let next = next.clone();
            thread::spawn(move || {
                for s in 0..PER_THREAD as i64 {
                    let n = (t as i64) * 10_000 + s;
                    let value = mock
                        .intercept(Call::new(next.clone(), vec![Value::Int(n)]))
                        .unwrap();
                    assert_eq!(value, Value::Int(n + 1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let log = mock.invocations();
    assert_eq!(log.count(), THREADS * PER_THREAD);
    assert!(log
        .iter()
        .all(|inv| inv.matching_setup().is_some() && inv.exception().is_none()));
}
