/*!
 * Ingress
 *
 * Write-only endpoint feeding a background dispatch task. The task runs
 * one broadcast round per received value and exits once every clone of
 * the ingress has been dropped; rounds already in progress finish first.
 */

use super::manager::Broadcaster;
use crate::core::errors::{SyncError, SyncResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Producer side of a broadcast manager
///
/// Clones feed the same dispatch task. Dropping the last clone closes it.
pub struct Ingress<T> {
    sender: flume::Sender<T>,
}

impl<T> Ingress<T> {
    /// Hand a value to the dispatch task, blocking while the ingress is full
    ///
    /// Never call this from inside an async task; use `send_async` there.
    pub fn send(&self, value: T) -> SyncResult<()> {
        self.sender
            .send(value)
            .map_err(|_| SyncError::Closed("dispatch task stopped".into()))
    }

    pub async fn send_async(&self, value: T) -> SyncResult<()> {
        self.sender
            .send_async(value)
            .await
            .map_err(|_| SyncError::Closed("dispatch task stopped".into()))
    }

    /// True once the dispatch task is gone
    pub fn is_closed(&self) -> bool {
        self.sender.is_disconnected()
    }

    /// Drop this producer handle
    pub fn close(self) {}
}

impl<T> Clone for Ingress<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Ingress<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingress")
            .field("pending", &self.sender.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    /// Open an ingress on the current Tokio runtime
    pub fn ingress(&self) -> SyncResult<Ingress<T>> {
        self.ingress_with_handle().map(|(ingress, _)| ingress)
    }

    /// Like `ingress`, also returning the dispatch task
    ///
    /// The task resolves to the number of rounds it dispatched.
    pub fn ingress_with_handle(&self) -> SyncResult<(Ingress<T>, JoinHandle<u64>)> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        Ok(self.ingress_on(&runtime))
    }

    /// Open an ingress whose dispatch task runs on `runtime`
    pub fn ingress_on(&self, runtime: &Handle) -> (Ingress<T>, JoinHandle<u64>) {
        let (sender, receiver) = flume::bounded(self.config().ingress_capacity);
        let task = runtime.spawn(dispatch(self.clone(), receiver));
        (Ingress { sender }, task)
    }
}

#[instrument(name = "broadcast_dispatch", skip_all)]
async fn dispatch<T>(broadcaster: Broadcaster<T>, receiver: flume::Receiver<T>) -> u64
where
    T: Clone + Send + 'static,
{
    info!("Dispatch task started");

    let mut rounds = 0u64;
    while let Ok(value) = receiver.recv_async().await {
        let report = broadcaster.publish(value);
        rounds += 1;
        debug!(
            round = rounds,
            delivered = report.delivered,
            probation = report.probation.len(),
            evicted = report.evicted.len(),
            "Broadcast round complete"
        );
    }

    info!(rounds, "Ingress closed, dispatch task stopped");
    rounds
}
