use std::sync::{Arc, Mutex};

use jobtrack_core::clock::Clock;
use jobtrack_core::error::{Result, TrackerError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::ledger::{WriteFailure, WriteLedger};
use super::remote_sync::{RemoteSync, RemoteWrite};

enum WriterMessage {
    Write { user_id: String, write: RemoteWrite },
    Flush(oneshot::Sender<()>),
}

/// Runs remote writes on a background task, one at a time and in the order
/// they were queued.
///
/// Callers never wait for a write. Outcomes go to the [`WriteLedger`].
/// Writes already queued are never cancelled: dropping the writer closes
/// the queue and the task drains it before exiting.
pub struct RemoteWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
    ledger: Arc<WriteLedger>,
    clock: Arc<dyn Clock>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteWriter {
    /// Spawns the worker. Must be called from within a Tokio runtime.
    pub fn spawn(remote: RemoteSync, ledger: Arc<WriteLedger>, clock: Arc<dyn Clock>) -> Result<Self> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| TrackerError::internal(format!("No async runtime for remote writer: {}", e)))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = handle.spawn(run(rx, remote, ledger.clone(), clock.clone()));
        Ok(Self {
            tx,
            ledger,
            clock,
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn enqueue(&self, user_id: String, write: RemoteWrite) {
        tracing::debug!("[RemoteWriter] Queued {} {}", write.operation(), write.record_id());
        self.ledger.begin();
        let record_id = write.record_id().to_string();
        let operation = write.operation();
        if self.tx.send(WriterMessage::Write { user_id, write }).is_err() {
            tracing::error!("[RemoteWriter] Worker stopped, dropping {} {}", operation, record_id);
            self.ledger.fail(WriteFailure {
                record_id,
                operation,
                error: TrackerError::internal("remote writer stopped"),
                at: self.clock.now(),
            });
        }
    }

    /// Waits until every write queued before this call has finished.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Drains the queue and stops the worker.
    pub async fn close(&self) {
        self.flush().await;
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(worker) = worker {
            worker.abort();
            let _ = worker.await;
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    remote: RemoteSync,
    ledger: Arc<WriteLedger>,
    clock: Arc<dyn Clock>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            WriterMessage::Write { user_id, write } => match remote.execute(&user_id, &write).await {
                Ok(()) => {
                    tracing::debug!("[RemoteWriter] Completed {} {}", write.operation(), write.record_id());
                    ledger.succeed();
                }
                Err(e) => {
                    tracing::error!(
                        "[RemoteWriter] Failed to {} {}: {}",
                        write.operation(),
                        write.record_id(),
                        e
                    );
                    ledger.fail(WriteFailure {
                        record_id: write.record_id().to_string(),
                        operation: write.operation(),
                        error: e,
                        at: clock.now(),
                    });
                }
            },
            WriterMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("[RemoteWriter] Queue closed");
}
