/*!
 * Containers Module
 * Concurrent map, broadcast-fed map and mutex-guarded slice
 */

pub mod broadcast_map;
pub mod map;
pub mod slice;

pub use broadcast_map::{Apply, BroadcastMap, BroadcastMapBuilder};
pub use map::ConcurrentMap;
pub use slice::ConcurrentSlice;
