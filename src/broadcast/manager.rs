/*!
 * Broadcast Manager
 *
 * Fans every published value out to the live consumer set with
 * non-blocking delivery. A consumer that misses two consecutive rounds is
 * evicted and its id is reported on the optional dead sink.
 */

use super::config::{BroadcastConfig, Delivery};
use super::consumer::Consumer;
use super::registry::{ConsumerState, Outcome, Registry};
use super::types::{BroadcastStats, Counters, RoundReport};
use crate::core::types::ConsumerId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-value callback run before fan-out
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub(super) struct Shared<T> {
    pub registry: Registry<T>,
    pub handler: Option<Handler<T>>,
    pub dead_sink: Option<flume::Sender<ConsumerId>>,
    pub config: BroadcastConfig,
    pub counters: Counters,
}

/// Fan-out manager
///
/// Cheap to clone; clones share the registry, handler and statistics.
///
/// # Example
///
/// ```ignore
/// let broadcaster = Broadcaster::<u64>::new();
/// let consumer = broadcaster.register_with(Delivery::Buffered(16));
/// let ingress = broadcaster.ingress()?;
///
/// ingress.send_async(42).await?;
/// assert_eq!(consumer.recv_async().await?, 42);
/// ```
pub struct Broadcaster<T> {
    pub(super) shared: Arc<Shared<T>>,
}

impl<T> Broadcaster<T> {
    /// Manager with no handler and no dead sink
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> BroadcasterBuilder<T> {
        BroadcasterBuilder::new()
    }

    /// Register a consumer using the configured default delivery
    pub fn register(&self) -> Consumer<T> {
        self.register_with(self.shared.config.default_delivery)
    }

    /// Register a consumer with an explicit delivery shape
    pub fn register_with(&self, delivery: Delivery) -> Consumer<T> {
        let (sender, receiver) = flume::bounded(delivery.capacity());
        let id = self.shared.registry.insert(sender);
        debug!(consumer = %id, capacity = delivery.capacity(), "Registered consumer");
        Consumer::new(id, receiver)
    }

    /// Remove a consumer outside the probation protocol
    ///
    /// No dead notification is emitted; returns false if it was not registered.
    pub fn evict(&self, id: ConsumerId) -> bool {
        let removed = self.shared.registry.remove(id);
        if removed {
            debug!(consumer = %id, "Consumer removed by caller");
        }
        removed
    }

    pub fn is_registered(&self, id: ConsumerId) -> bool {
        self.shared.registry.state(id).is_some()
    }

    pub fn is_on_probation(&self, id: ConsumerId) -> bool {
        self.shared.registry.state(id) == Some(ConsumerState::Probation)
    }

    pub fn consumer_count(&self) -> usize {
        self.shared.registry.len()
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.shared.config
    }

    pub fn stats(&self) -> BroadcastStats {
        self.shared.counters.snapshot(self.shared.registry.len())
    }

    fn notify_dead(&self, id: ConsumerId) {
        if let Some(sink) = &self.shared.dead_sink {
            if sink.try_send(id).is_err() {
                debug!(consumer = %id, "Dead sink unavailable, eviction notice dropped");
            }
        }
    }
}

impl<T: Clone> Broadcaster<T> {
    /// Run one broadcast round for `value`
    ///
    /// The handler runs first, even with no consumers registered. Each
    /// consumer then gets a single non-blocking delivery attempt; nothing
    /// here waits for a consumer to drain its buffer.
    pub fn publish(&self, value: T) -> RoundReport {
        if let Some(handler) = &self.shared.handler {
            handler(&value);
        }

        let mut report = RoundReport::default();

        for (id, sender) in self.shared.registry.targets() {
            let delivered = sender.try_send(value.clone()).is_ok();
            drop(sender);

            match self.shared.registry.settle(id, delivered) {
                Some(Outcome::Delivered) => report.delivered += 1,
                Some(Outcome::Probation) => {
                    debug!(consumer = %id, "Delivery missed, consumer on probation");
                    report.probation.push(id);
                }
                Some(Outcome::Evicted) => {
                    warn!(consumer = %id, "Consumer missed consecutive deliveries, evicted");
                    self.notify_dead(id);
                    report.evicted.push(id);
                }
                // Removed concurrently by another round or by the caller
                None => {}
            }
        }

        self.shared.counters.record(&report);
        report
    }
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("consumers", &self.consumer_count())
            .field("has_handler", &self.shared.handler.is_some())
            .field("has_dead_sink", &self.shared.dead_sink.is_some())
            .field("config", &self.shared.config)
            .finish()
    }
}

/// Builder for `Broadcaster`
pub struct BroadcasterBuilder<T> {
    config: BroadcastConfig,
    handler: Option<Handler<T>>,
    dead_sink: Option<flume::Sender<ConsumerId>>,
}

impl<T> BroadcasterBuilder<T> {
    pub fn new() -> Self {
        Self {
            config: BroadcastConfig::default(),
            handler: None,
            dead_sink: None,
        }
    }

    pub fn with_config(mut self, config: BroadcastConfig) -> Self {
        self.config = config;
        self
    }

    /// Callback run once per value, before fan-out
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Sink receiving the id of every evicted consumer (best-effort)
    pub fn with_dead_sink(mut self, sink: flume::Sender<ConsumerId>) -> Self {
        self.dead_sink = Some(sink);
        self
    }

    pub fn build(self) -> Broadcaster<T> {
        Broadcaster {
            shared: Arc::new(Shared {
                registry: Registry::new(),
                handler: self.handler,
                dead_sink: self.dead_sink,
                config: self.config,
                counters: Counters::default(),
            }),
        }
    }
}

impl<T> Default for BroadcasterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
