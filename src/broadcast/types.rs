/*!
 * Broadcast Types
 * Round outcomes and manager statistics
 */

use crate::core::types::ConsumerId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome of a single broadcast round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Consumers that accepted the value
    pub delivered: usize,
    /// Consumers that missed the value and are now on probation
    pub probation: Vec<ConsumerId>,
    /// Consumers removed this round after a second consecutive miss
    pub evicted: Vec<ConsumerId>,
}

impl RoundReport {
    /// Total delivery attempts made this round
    pub fn attempted(&self) -> usize {
        self.delivered + self.probation.len() + self.evicted.len()
    }
}

/// Broadcast statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastStats {
    pub rounds: u64,
    pub delivered: u64,
    pub missed: u64,
    pub evicted: u64,
    pub consumers: usize,
}

/// Lock-free counters behind `BroadcastStats`
#[derive(Debug, Default)]
pub(super) struct Counters {
    rounds: AtomicU64,
    delivered: AtomicU64,
    missed: AtomicU64,
    evicted: AtomicU64,
}

impl Counters {
    pub fn record(&self, report: &RoundReport) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
        self.delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.missed.fetch_add(
            (report.probation.len() + report.evicted.len()) as u64,
            Ordering::Relaxed,
        );
        self.evicted
            .fetch_add(report.evicted.len() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self, consumers: usize) -> BroadcastStats {
        BroadcastStats {
            rounds: self.rounds.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            missed: self.missed.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            consumers,
        }
    }
}
