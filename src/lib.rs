/*!
 * gensync
 * Generic concurrent containers and a fan-out broadcast manager
 *
 * - `broadcast`: non-blocking fan-out with probation and eviction of
 *   unresponsive consumers
 * - `pool`: object pool with amortized doubling growth
 * - `once`: memoized one-shot computation
 * - `containers`: concurrent map, broadcast-fed map, guarded slice
 * - `core`: shared errors, limits, types and lock aliases
 */

pub mod broadcast;
pub mod containers;
pub mod core;
pub mod monitoring;
pub mod once;
pub mod pool;

// Re-exports
pub use broadcast::{
    BroadcastConfig, BroadcastStats, Broadcaster, Consumer, Delivery, Ingress, RoundReport,
};
pub use containers::{BroadcastMap, ConcurrentMap, ConcurrentSlice};
pub use crate::core::errors::{SyncError, SyncResult};
pub use crate::core::sync::{Mutex, RwLock, WaitGroup};
pub use crate::core::types::{zero, ConsumerId, KeyValue};
pub use monitoring::init_tracing;
pub use once::{once_fn, once_value, once_values, ErasedResults, Once};
pub use pool::{GrowablePool, PoolConfig, PoolGuard, PoolStats};
