/*!
 * Broadcast Configuration
 *
 * Consumer delivery shapes and manager-wide settings
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::DEFAULT_INGRESS_CAPACITY;
use serde::{Deserialize, Serialize};

/// Buffering shape of a consumer endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "capacity", rename_all = "snake_case")]
pub enum Delivery {
    /// Capacity 0: a value is handed over only if the consumer is waiting
    #[default]
    Rendezvous,
    /// Up to N values buffered without the consumer waiting
    Buffered(usize),
}

impl Delivery {
    /// Channel capacity backing this shape
    #[inline]
    pub const fn capacity(self) -> usize {
        match self {
            Delivery::Rendezvous => 0,
            Delivery::Buffered(n) => n,
        }
    }
}

/// Parse a raw argument list: none means rendezvous, one means a capacity
impl TryFrom<&[usize]> for Delivery {
    type Error = SyncError;

    fn try_from(args: &[usize]) -> SyncResult<Self> {
        match args {
            [] => Ok(Delivery::Rendezvous),
            [capacity] => Ok(Delivery::Buffered(*capacity)),
            _ => Err(SyncError::InvalidArgument(format!(
                "expected at most one consumer capacity, got {}",
                args.len()
            ))),
        }
    }
}

/// Broadcast manager configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Capacity of each ingress channel (0 = producer hands off to the dispatch task)
    pub ingress_capacity: usize,
    /// Shape used by `register()`
    pub default_delivery: Delivery,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            ingress_capacity: DEFAULT_INGRESS_CAPACITY,
            default_delivery: Delivery::Rendezvous,
        }
    }
}

impl BroadcastConfig {
    /// Consumers registered with `register()` buffer `capacity` values
    pub const fn buffered_consumers(capacity: usize) -> Self {
        Self {
            ingress_capacity: DEFAULT_INGRESS_CAPACITY,
            default_delivery: Delivery::Buffered(capacity),
        }
    }

    /// Let producers run ahead of the dispatch task by `capacity` values
    pub const fn with_ingress_capacity(mut self, capacity: usize) -> Self {
        self.ingress_capacity = capacity;
        self
    }
}
