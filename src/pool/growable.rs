/*!
 * Growable Object Pool
 *
 * Reuses instances through a bounded ring that doubles when a release
 * finds it full. Already-buffered instances are drained into the new ring
 * in order before the released one is stored. Capacity never shrinks, so
 * peak concurrent demand sets the pool's permanent footprint.
 *
 * Every ring access (pop, push, growth) serializes behind one lock;
 * growth must be atomic with respect to concurrent releases. The one
 * exception is minting: when `acquire` finds the ring empty it drops the
 * lock before calling the factory.
 */

use super::config::PoolConfig;
use crate::core::limits::POOL_GROWTH_FACTOR;
use crate::core::sync::Mutex;
use crate::core::types::zero;
use crossbeam_queue::ArrayQueue;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Mints a fresh instance when the pool is empty
pub type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub available: usize,
    pub capacity: usize,
    pub created: u64,
    pub reused: u64,
    pub released: u64,
    pub growths: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    created: AtomicU64,
    reused: AtomicU64,
    released: AtomicU64,
    growths: AtomicU64,
}

/// Thread-safe object pool with amortized doubling growth
///
/// # Example
///
/// ```ignore
/// let pool = GrowablePool::with_factory(|| Vec::<u8>::with_capacity(4096));
/// let buf = pool.acquire();
/// pool.release(buf);
/// assert_eq!(pool.capacity(), 2);
/// ```
pub struct GrowablePool<T> {
    /// `None` until the first ring is allocated
    ring: Mutex<Option<ArrayQueue<T>>>,
    factory: Factory<T>,
    config: PoolConfig,
    counters: PoolCounters,
}

impl<T: Default + 'static> GrowablePool<T> {
    /// Pool that mints `T::default()` when empty
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self::with_factory_and_config(zero::<T>, config)
    }
}

impl<T> GrowablePool<T> {
    /// Pool that calls `factory` when empty
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_factory_and_config(factory, PoolConfig::default())
    }

    pub fn with_factory_and_config<F>(factory: F, config: PoolConfig) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let ring = (config.initial_capacity > 0).then(|| ArrayQueue::new(config.initial_capacity));
        Self {
            ring: Mutex::new(ring),
            factory: Box::new(factory),
            config,
            counters: PoolCounters::default(),
        }
    }

    /// Take a buffered instance, or mint a new one
    ///
    /// Buffered instances are not handed out in any guaranteed order.
    pub fn acquire(&self) -> T {
        let reused = self.ring.lock().as_ref().and_then(ArrayQueue::pop);
        match reused {
            Some(item) => {
                self.counters.reused.fetch_add(1, Ordering::Relaxed);
                item
            }
            None => {
                self.counters.created.fetch_add(1, Ordering::Relaxed);
                (self.factory)()
            }
        }
    }

    /// Return an instance for reuse, growing the ring if it is full
    pub fn release(&self, item: T) {
        let mut ring = self.ring.lock();
        self.counters.released.fetch_add(1, Ordering::Relaxed);

        let item = match ring.as_ref() {
            Some(queue) => match queue.push(item) {
                Ok(()) => return,
                Err(item) => item,
            },
            None => item,
        };

        self.grow(&mut ring, item);
    }

    /// Replace the ring with one of double capacity, then store `item`
    fn grow(&self, ring: &mut Option<ArrayQueue<T>>, item: T) {
        let old_capacity = ring.as_ref().map_or(0, ArrayQueue::capacity);
        let new_capacity = if old_capacity == 0 {
            self.config.effective_seed()
        } else {
            old_capacity * POOL_GROWTH_FACTOR
        };

        let grown = ArrayQueue::new(new_capacity);
        if let Some(old) = ring.take() {
            while let Some(buffered) = old.pop() {
                assert!(
                    grown.push(buffered).is_ok(),
                    "pool growth invariant violated: drained items exceed new capacity"
                );
            }
        }
        assert!(
            grown.push(item).is_ok(),
            "pool growth invariant violated: no room for released item"
        );

        *ring = Some(grown);
        self.counters.growths.fetch_add(1, Ordering::Relaxed);
        debug!(old_capacity, new_capacity, "Pool ring grown");
    }

    /// Current ring capacity
    pub fn capacity(&self) -> usize {
        self.ring.lock().as_ref().map_or(0, ArrayQueue::capacity)
    }

    /// Instances currently buffered
    pub fn len(&self) -> usize {
        self.ring.lock().as_ref().map_or(0, ArrayQueue::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn stats(&self) -> PoolStats {
        let (available, capacity) = {
            let ring = self.ring.lock();
            ring.as_ref()
                .map_or((0, 0), |queue| (queue.len(), queue.capacity()))
        };

        PoolStats {
            available,
            capacity,
            created: self.counters.created.load(Ordering::Relaxed),
            reused: self.counters.reused.load(Ordering::Relaxed),
            released: self.counters.released.load(Ordering::Relaxed),
            growths: self.counters.growths.load(Ordering::Relaxed),
        }
    }
}

impl<T: Default + 'static> Default for GrowablePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for GrowablePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowablePool")
            .field("stats", &self.stats())
            .finish()
    }
}
