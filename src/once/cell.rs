/*!
 * Once Cell
 *
 * Runs a zero-argument computation exactly once and replays its result to
 * every caller. The completed flag is read without locking; only first
 * callers contend on the lock, and whoever wins it re-checks the flag
 * before running anything.
 */

use crate::core::sync::Mutex;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Memoized one-shot computation
///
/// The result type fixes the result arity at the call site: `()` for no
/// results, `T` for one, a tuple for several, or `ErasedResults` when the
/// shape is only known at runtime.
///
/// If the computation panics the cell stays incomplete and the next caller
/// runs its own computation. Calling `run` on the same cell from inside
/// the computation deadlocks.
pub struct Once<R> {
    done: AtomicBool,
    lock: Mutex<()>,
    result: UnsafeCell<Option<R>>,
}

// SAFETY: the result is written once, under `lock`, before `done` is
// released; afterwards it is only read. Sharing therefore needs R: Sync for
// the reads and R: Send since the writing thread may differ from readers.
unsafe impl<R: Send + Sync> Sync for Once<R> {}
unsafe impl<R: Send> Send for Once<R> {}

impl<R> Once<R> {
    pub const fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
            lock: Mutex::new(()),
            result: UnsafeCell::new(None),
        }
    }

    /// Execute `computation` unless some caller already has, then return
    /// the cached result
    pub fn run<F>(&self, computation: F) -> &R
    where
        F: FnOnce() -> R,
    {
        if let Some(result) = self.get() {
            return result;
        }

        let _guard = self.lock.lock();

        // Lost the race: the winner finished while we waited for the lock
        if let Some(result) = self.get() {
            return result;
        }

        let value = computation();

        // SAFETY: we hold the lock and `done` is false, so no other thread
        // is writing and no reader has been handed a reference yet.
        let slot = unsafe { &mut *self.result.get() };
        let result: &R = slot.insert(value);
        self.done.store(true, Ordering::Release);
        result
    }

    /// Cached result, if the computation has completed
    #[inline]
    pub fn get(&self) -> Option<&R> {
        if self.done.load(Ordering::Acquire) {
            // SAFETY: `done` is only set after the single write completed.
            unsafe { (*self.result.get()).as_ref() }
        } else {
            None
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Consume the cell, returning the result if it was computed
    pub fn into_inner(self) -> Option<R> {
        self.result.into_inner()
    }
}

impl<R> Default for Once<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for Once<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Once").field("result", &self.get()).finish()
    }
}
