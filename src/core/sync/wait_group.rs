/*!
 * Wait Group
 *
 * Counter-based barrier on parking_lot::Condvar: callers `add` pending
 * work, workers call `done`, and `wait` blocks until the counter is zero.
 */

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Inner {
    count: Mutex<usize>,
    condvar: Condvar,
}

/// Waits for a collection of tasks to finish
///
/// Clones share the same counter.
#[derive(Clone)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                count: Mutex::new(0),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Register `n` pending tasks
    pub fn add(&self, n: usize) {
        *self.inner.count.lock() += n;
    }

    /// Mark one task finished
    ///
    /// # Panics
    ///
    /// Panics if called more times than tasks were added.
    pub fn done(&self) {
        let mut count = self.inner.count.lock();
        assert!(*count > 0, "wait group counter went negative");
        *count -= 1;
        if *count == 0 {
            self.inner.condvar.notify_all();
        }
    }

    /// Pending task count
    pub fn count(&self) -> usize {
        *self.inner.count.lock()
    }

    /// Block until every added task has called `done`
    pub fn wait(&self) {
        let mut count = self.inner.count.lock();
        while *count > 0 {
            self.inner.condvar.wait(&mut count);
        }
    }

    /// Like `wait`, but gives up after `timeout`; returns false on timeout
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.inner.count.lock();
        while *count > 0 {
            if self
                .inner
                .condvar
                .wait_until(&mut count, deadline)
                .timed_out()
            {
                return *count == 0;
            }
        }
        true
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WaitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitGroup")
            .field("count", &self.count())
            .finish()
    }
}
