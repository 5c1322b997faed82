/*!
 * Once Wrappers
 *
 * Pre-typed wrappers for the common result shapes: no result, one value
 * and a pair. Each returns a callable that runs the computation on first
 * call and replays the cached result afterwards.
 */

use super::cell::Once;
use crate::core::sync::Mutex;

const ALREADY_CONSUMED: &str = "once computation panicked on an earlier call";

/// Wrap `f` so it runs at most once across all calls
pub fn once_fn<F>(f: F) -> impl Fn() + Send + Sync
where
    F: FnOnce() + Send,
{
    let cell = Once::<()>::new();
    let pending = Mutex::new(Some(f));

    move || {
        cell.run(|| {
            let f = pending.lock().take().expect(ALREADY_CONSUMED);
            f()
        });
    }
}

/// Wrap a single-value computation; every call returns a clone of its result
pub fn once_value<T, F>(f: F) -> impl Fn() -> T + Send + Sync
where
    T: Clone + Send + Sync,
    F: FnOnce() -> T + Send,
{
    let cell = Once::<T>::new();
    let pending = Mutex::new(Some(f));

    move || {
        cell.run(|| {
            let f = pending.lock().take().expect(ALREADY_CONSUMED);
            f()
        })
        .clone()
    }
}

/// Wrap a two-value computation; every call returns clones of both results
pub fn once_values<A, B, F>(f: F) -> impl Fn() -> (A, B) + Send + Sync
where
    A: Clone + Send + Sync,
    B: Clone + Send + Sync,
    F: FnOnce() -> (A, B) + Send,
{
    let cell = Once::<(A, B)>::new();
    let pending = Mutex::new(Some(f));

    move || {
        cell.run(|| {
            let f = pending.lock().take().expect(ALREADY_CONSUMED);
            f()
        })
        .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_once_fn_side_effect_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let init = once_fn(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        init();
        init();
        init();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_once_value_replays() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let config = once_value(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3]
        });

        assert_eq!(config(), vec![1, 2, 3]);
        assert_eq!(config(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_once_values_pair() {
        let parse = once_values(|| ("port".to_string(), 8080u16));
        assert_eq!(parse(), ("port".to_string(), 8080));
        assert_eq!(parse().1, 8080);
    }
}
