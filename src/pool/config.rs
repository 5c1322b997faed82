/*!
 * Pool Configuration
 */

use crate::core::limits::POOL_GROWTH_SEED;
use serde::{Deserialize, Serialize};

/// Growable pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Ring capacity allocated up front (0 = allocate on first release)
    pub initial_capacity: usize,
    /// Capacity of the first ring when growing from zero
    pub growth_seed: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth_seed: POOL_GROWTH_SEED,
        }
    }
}

impl PoolConfig {
    /// Pre-size the ring for an expected peak
    pub const fn with_initial_capacity(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            growth_seed: POOL_GROWTH_SEED,
        }
    }

    /// Seed actually used; a ring can never be zero-sized
    #[inline]
    pub(super) fn effective_seed(&self) -> usize {
        self.growth_seed.max(1)
    }
}
