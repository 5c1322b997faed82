/*!
 * Consumer Registry
 *
 * Live consumer set keyed by stable id, with per-consumer miss tracking.
 *
 * # State machine
 *
 * Live --miss--> Probation --miss--> Evicted
 *   ^                |
 *   +----deliver-----+
 *
 * A consumer leaves the registry only through eviction (or an explicit
 * `remove`). Each transition is decided and applied under a single entry
 * lock, so overlapping rounds settle strikes one at a time: two misses
 * always evict, whichever rounds they came from.
 */

use crate::core::limits::EVICTION_STRIKES;
use crate::core::types::ConsumerId;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Liveness state of a registered consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Live,
    Probation,
}

/// Result of settling one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Outcome {
    Delivered,
    Probation,
    Evicted,
}

struct Slot<T> {
    sender: flume::Sender<T>,
    misses: u32,
}

impl<T> Slot<T> {
    #[inline]
    fn state(&self) -> ConsumerState {
        if self.misses == 0 {
            ConsumerState::Live
        } else {
            ConsumerState::Probation
        }
    }
}

pub(super) struct Registry<T> {
    slots: DashMap<ConsumerId, Slot<T>, RandomState>,
    next_id: AtomicU64,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            slots: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn insert(&self, sender: flume::Sender<T>) -> ConsumerId {
        let id = ConsumerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slots.insert(id, Slot { sender, misses: 0 });
        id
    }

    /// Snapshot of every live sender
    ///
    /// Collected up front so no shard lock is held while delivering or
    /// while settling outcomes (which mutate the same shards).
    pub fn targets(&self) -> Vec<(ConsumerId, flume::Sender<T>)> {
        self.slots
            .iter()
            .map(|entry| (*entry.key(), entry.value().sender.clone()))
            .collect()
    }

    /// Apply one delivery outcome; `None` if the consumer is already gone
    pub fn settle(&self, id: ConsumerId, delivered: bool) -> Option<Outcome> {
        if delivered {
            let mut slot = self.slots.get_mut(&id)?;
            slot.misses = 0;
            return Some(Outcome::Delivered);
        }

        match self.slots.entry(id) {
            Entry::Occupied(entry) if entry.get().misses + 1 >= EVICTION_STRIKES => {
                entry.remove();
                Some(Outcome::Evicted)
            }
            Entry::Occupied(mut entry) => {
                entry.get_mut().misses += 1;
                Some(Outcome::Probation)
            }
            Entry::Vacant(_) => None,
        }
    }

    pub fn remove(&self, id: ConsumerId) -> bool {
        self.slots.remove(&id).is_some()
    }

    pub fn state(&self, id: ConsumerId) -> Option<ConsumerState> {
        self.slots.get(&id).map(|slot| slot.state())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
