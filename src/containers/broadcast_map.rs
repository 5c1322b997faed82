/*!
 * Broadcast Map
 *
 * A concurrent map whose updates arrive through a broadcast ingress. Each
 * key/value written to the ingress is applied to the map (an upsert by
 * default) before being fanned out to any registered observers.
 */

use super::map::ConcurrentMap;
use crate::broadcast::{
    BroadcastConfig, Broadcaster, BroadcasterBuilder, Consumer, Delivery, Ingress, RoundReport,
};
use crate::core::errors::SyncResult;
use crate::core::types::{ConsumerId, KeyValue};
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

/// How an ingress update is applied to the map
pub type Apply<K, V> = Arc<dyn Fn(&ConcurrentMap<K, V>, &KeyValue<K, V>) + Send + Sync>;

/// Map fed by a broadcast manager
///
/// Derefs to the underlying `ConcurrentMap` for direct reads and writes.
pub struct BroadcastMap<K, V> {
    map: ConcurrentMap<K, V>,
    broadcaster: Broadcaster<KeyValue<K, V>>,
}

impl<K, V> BroadcastMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Map that upserts every ingress update
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> BroadcastMapBuilder<K, V> {
        BroadcastMapBuilder::new()
    }

    pub fn map(&self) -> &ConcurrentMap<K, V> {
        &self.map
    }

    pub fn broadcaster(&self) -> &Broadcaster<KeyValue<K, V>> {
        &self.broadcaster
    }

    /// Open an update ingress on the current Tokio runtime
    pub fn ingress(&self) -> SyncResult<Ingress<KeyValue<K, V>>> {
        self.broadcaster.ingress()
    }

    /// Apply and fan out one update synchronously
    pub fn publish(&self, key: K, value: V) -> RoundReport {
        self.broadcaster.publish(KeyValue::new(key, value))
    }

    /// Observe applied updates
    pub fn register(&self) -> Consumer<KeyValue<K, V>> {
        self.broadcaster.register()
    }

    pub fn register_with(&self, delivery: Delivery) -> Consumer<KeyValue<K, V>> {
        self.broadcaster.register_with(delivery)
    }
}

impl<K, V> Deref for BroadcastMap<K, V> {
    type Target = ConcurrentMap<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<K, V> Clone for BroadcastMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            broadcaster: self.broadcaster.clone(),
        }
    }
}

impl<K, V> Default for BroadcastMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `BroadcastMap`
pub struct BroadcastMapBuilder<K, V> {
    inner: BroadcasterBuilder<KeyValue<K, V>>,
    apply: Option<Apply<K, V>>,
}

impl<K, V> BroadcastMapBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: BroadcasterBuilder::new(),
            apply: None,
        }
    }

    pub fn with_config(mut self, config: BroadcastConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    pub fn with_dead_sink(mut self, sink: flume::Sender<ConsumerId>) -> Self {
        self.inner = self.inner.with_dead_sink(sink);
        self
    }

    /// Replace the default upsert
    pub fn with_apply<F>(mut self, apply: F) -> Self
    where
        F: Fn(&ConcurrentMap<K, V>, &KeyValue<K, V>) + Send + Sync + 'static,
    {
        self.apply = Some(Arc::new(apply));
        self
    }

    pub fn build(self) -> BroadcastMap<K, V> {
        let map = ConcurrentMap::new();
        let target = map.clone();
        let apply: Apply<K, V> = match self.apply {
            Some(apply) => apply,
            None => Arc::new(upsert::<K, V>),
        };

        let broadcaster = self
            .inner
            .with_handler(move |kv: &KeyValue<K, V>| apply(&target, kv))
            .build();

        BroadcastMap { map, broadcaster }
    }
}

fn upsert<K, V>(map: &ConcurrentMap<K, V>, kv: &KeyValue<K, V>)
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    map.store(kv.key.clone(), kv.value.clone());
}

impl<K, V> Default for BroadcastMapBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
