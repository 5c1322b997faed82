/*!
 * Limits and Constants
 *
 * Centralized location for toolkit-wide thresholds and magic numbers.
 */

// =============================================================================
// BROADCAST
// =============================================================================

/// Consecutive missed deliveries that evict a consumer.
/// The first miss puts a consumer on probation, the second removes it.
pub const EVICTION_STRIKES: u32 = 2;

/// Ingress channel capacity (0 = rendezvous with the dispatch task)
pub const DEFAULT_INGRESS_CAPACITY: usize = 0;

// =============================================================================
// POOL
// =============================================================================

/// Capacity of the first ring allocated by an empty pool
pub const POOL_GROWTH_SEED: usize = 2;

/// Multiplier applied on every pool growth
pub const POOL_GROWTH_FACTOR: usize = 2;
