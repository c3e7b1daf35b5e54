//! Background writer for the favorites blob

use tokio::sync::{mpsc, oneshot};

use crate::store::KeyValueStore;

/// Message for the persister task
#[derive(Debug)]
enum PersistMessage {
    /// Write `blob` under the favorites key
    Save {
        /// Serialized favorite set
        blob: String,
    },
    /// Acknowledge once every earlier message has been handled
    Flush {
        /// Signalled when the queue up to here is drained
        ack: oneshot::Sender<()>,
    },
    /// Stop the persister
    Shutdown,
}

/// A write that did not reach the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    /// Storage key that was being written
    pub key: String,
    /// Error description
    pub error: String,
}

/// Handle to a running persister task
#[derive(Debug)]
pub struct Persister {
    sender: mpsc::UnboundedSender<PersistMessage>,
    failure_rx: mpsc::UnboundedReceiver<PersistFailure>,
}

impl Persister {
    /// Spawn a persister writing to `store` under `key`
    pub fn spawn<S: KeyValueStore>(store: S, key: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();

        tokio::spawn(persister_task(rx, failure_tx, store, key));

        Self {
            sender: tx,
            failure_rx,
        }
    }

    /// Queue a write of `blob`
    pub fn save(&self, blob: String) {
        if self.sender.send(PersistMessage::Save { blob }).is_err() {
            tracing::warn!("Favorites persister is gone, write dropped");
        }
    }

    /// Wait until every queued write has been attempted
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(PersistMessage::Flush { ack }).is_ok() {
            let _ = done.await;
        }
    }

    /// Drain failures reported since the last poll (non-blocking)
    pub fn poll_failures(&mut self) -> Vec<PersistFailure> {
        let mut failures = Vec::new();
        while let Ok(failure) = self.failure_rx.try_recv() {
            failures.push(failure);
        }
        failures
    }

    /// Stop the persister after the queued writes
    pub fn shutdown(&self) {
        let _ = self.sender.send(PersistMessage::Shutdown);
    }
}

/// Background task that writes favorites blobs in order
async fn persister_task<S: KeyValueStore>(
    mut rx: mpsc::UnboundedReceiver<PersistMessage>,
    failure_tx: mpsc::UnboundedSender<PersistFailure>,
    store: S,
    key: String,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            PersistMessage::Save { blob } => {
                if let Err(e) = store.set(&key, &blob).await {
                    tracing::warn!("Failed to persist favorites: {e:#}");
                    let _ = failure_tx.send(PersistFailure {
                        key: key.clone(),
                        error: format!("{e:#}"),
                    });
                }
            }
            PersistMessage::Flush { ack } => {
                let _ = ack.send(());
            }
            PersistMessage::Shutdown => {
                tracing::debug!("Favorites persister shutting down");
                break;
            }
        }
    }
}
