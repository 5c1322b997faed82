/*!
 * Consumer Handle
 * Receiving endpoint returned by registration
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::types::ConsumerId;
use futures::Stream;
use std::time::Duration;

/// A registered consumer's receiving endpoint
///
/// Reads block only on this consumer's own buffer, never on the manager.
/// Once evicted (or once the manager is dropped) the remaining buffered
/// values can still be drained, after which reads report `Disconnected`.
pub struct Consumer<T> {
    id: ConsumerId,
    receiver: flume::Receiver<T>,
}

impl<T> Consumer<T> {
    pub(super) fn new(id: ConsumerId, receiver: flume::Receiver<T>) -> Self {
        Self { id, receiver }
    }

    /// Registry identifier, as reported on the dead sink
    #[inline]
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Block until a value arrives
    pub fn recv(&self) -> SyncResult<T> {
        self.receiver
            .recv()
            .map_err(|_| SyncError::Disconnected(self.id.get()))
    }

    /// Wait asynchronously for a value
    pub async fn recv_async(&self) -> SyncResult<T> {
        self.receiver
            .recv_async()
            .await
            .map_err(|_| SyncError::Disconnected(self.id.get()))
    }

    /// Take a buffered value without waiting
    pub fn try_recv(&self) -> SyncResult<Option<T>> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(flume::TryRecvError::Empty) => Ok(None),
            Err(flume::TryRecvError::Disconnected) => {
                Err(SyncError::Disconnected(self.id.get()))
            }
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> SyncResult<T> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            flume::RecvTimeoutError::Timeout => SyncError::Timeout,
            flume::RecvTimeoutError::Disconnected => SyncError::Disconnected(self.id.get()),
        })
    }

    /// Values as an async stream, ending on disconnect
    pub fn stream(&self) -> impl Stream<Item = T> + '_ {
        self.receiver.stream()
    }

    /// Values currently buffered
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Buffer capacity (0 for rendezvous)
    pub fn capacity(&self) -> usize {
        self.receiver.capacity().unwrap_or(0)
    }

    /// True once the manager no longer holds this consumer's sender
    pub fn is_disconnected(&self) -> bool {
        self.receiver.is_disconnected()
    }
}

impl<T> std::fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.id)
            .field("buffered", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
