/*!
 * Once Tests
 * Exactly-once execution under concurrent first calls
 */

use gensync::once::{once_fn, once_value, once_values, ErasedResults, Once};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_first_calls_run_once() {
    const CALLERS: usize = 32;

    let once = Arc::new(Once::<String>::new());
    let counter = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let once = once.clone();
            let counter = counter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let result = once.run(|| {
                    // Widen the race window
                    thread::sleep(Duration::from_millis(20));
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    format!("computed-{}", n)
                });
                (result.clone(), result as *const String as usize)
            })
        })
        .collect();

    let results: Vec<(String, usize)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    let (first_value, first_addr) = results[0].clone();
    assert_eq!(first_value, "computed-1");
    for (value, addr) in results {
        assert_eq!(value, first_value);
        assert_eq!(addr, first_addr);
    }
}

#[test]
fn test_erased_results_escape_hatch() {
    let once = Once::<ErasedResults>::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let results = once.run(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            ErasedResults::new().with(42i32).with(String::from("answer"))
        });
        assert_eq!(results.len(), 2);
        assert_eq!(results.get::<i32>(0), Some(&42));
        assert_eq!(results.get::<String>(1).map(String::as_str), Some("answer"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wrappers_shared_across_threads() {
    let runs = Arc::new(AtomicUsize::new(0));

    let runs_fn = runs.clone();
    let init = Arc::new(once_fn(move || {
        runs_fn.fetch_add(1, Ordering::SeqCst);
    }));

    let runs_value = runs.clone();
    let value = Arc::new(once_value(move || {
        runs_value.fetch_add(1, Ordering::SeqCst);
        1234u64
    }));

    let runs_pair = runs.clone();
    let pair = Arc::new(once_values(move || {
        runs_pair.fetch_add(1, Ordering::SeqCst);
        ("host".to_string(), 443u16)
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let (init, value, pair) = (init.clone(), value.clone(), pair.clone());
            thread::spawn(move || {
                init();
                assert_eq!(value(), 1234);
                assert_eq!(pair(), ("host".to_string(), 443));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}
