/*!
 * Synchronization Primitives
 *
 * Shared lock aliases used by every container in the toolkit, plus a
 * condvar-backed wait group.
 */

mod wait_group;

pub use wait_group::WaitGroup;

/// Exclusive lock (non-poisoning)
pub type Mutex<T> = parking_lot::Mutex<T>;

/// Multi-reader lock (non-poisoning)
pub type RwLock<T> = parking_lot::RwLock<T>;

pub use parking_lot::{MutexGuard, RwLockReadGuard, RwLockWriteGuard};
