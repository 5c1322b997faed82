/*!
 * Broadcast Module
 *
 * Fan-out of values produced on one ingress to a dynamic set of consumers.
 *
 * # Delivery
 *
 * Every value triggers one round: the optional handler runs, then each
 * registered consumer gets exactly one try-send. The producer is never
 * blocked by a slow consumer; a consumer that misses two consecutive
 * rounds is evicted and reported on the dead sink.
 *
 * # Ordering
 *
 * Rounds fed through a single ingress run in send order, so a consumer
 * that keeps up sees values in that order. Separate ingress streams for
 * the same manager dispatch independently and may interleave.
 */

pub mod config;
pub mod consumer;
pub mod ingress;
pub mod manager;
mod registry;
pub mod types;

// Re-export public API
pub use config::{BroadcastConfig, Delivery};
pub use consumer::Consumer;
pub use ingress::Ingress;
pub use manager::{Broadcaster, BroadcasterBuilder, Handler};
pub use registry::ConsumerState;
pub use types::{BroadcastStats, RoundReport};
