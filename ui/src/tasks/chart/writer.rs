//! Background persistence for completed trials.
//!
//! The session hands each record to a [`QueuedSink`] and carries on; a single
//! writer drains the queue in order so appends land in completion order.

use api::{Gateway, ResponseRecord, WriteMode};
use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;

use crate::core::platform;

use super::session::{write_status, ResponseLog, ResponseSink, WriteStatus};

#[derive(Debug, Clone)]
pub struct WriteJob {
    pub sequence: usize,
    pub record: ResponseRecord,
    /// Full log at completion time, for overwrite mode.
    pub snapshot: Vec<ResponseRecord>,
}

/// Queues writes for [`drain_writes`]. Always reports `Pending`.
#[derive(Debug, Clone)]
pub struct QueuedSink {
    tx: UnboundedSender<WriteJob>,
    mode: WriteMode,
}

impl QueuedSink {
    pub fn new(tx: UnboundedSender<WriteJob>, mode: WriteMode) -> Self {
        Self { tx, mode }
    }
}

impl ResponseSink for QueuedSink {
    fn submit(&self, sequence: usize, record: &ResponseRecord, log: &ResponseLog) -> WriteStatus {
        let snapshot = match self.mode {
            WriteMode::Append => Vec::new(),
            WriteMode::Overwrite => log.records().to_vec(),
        };
        let job = WriteJob {
            sequence,
            record: *record,
            snapshot,
        };
        match self.tx.unbounded_send(job) {
            Ok(()) => WriteStatus::Pending,
            Err(_) => {
                tracing::warn!(sequence, "writer is gone; response kept locally");
                WriteStatus::Failed("writer stopped".into())
            }
        }
    }
}

/// Perform queued writes one at a time until every sender is dropped.
pub async fn drain_writes<F>(
    mut rx: UnboundedReceiver<WriteJob>,
    gateway: Gateway,
    mode: WriteMode,
    mut on_done: F,
) where
    F: FnMut(usize, WriteStatus),
{
    while let Some(job) = rx.next().await {
        let sequence = job.sequence;
        let worker = gateway.clone();
        let outcome = platform::run_blocking(move || {
            worker.write_response(mode, &job.record, &job.snapshot)
        })
        .await;

        let status = match outcome {
            Some(result) => write_status(sequence, result),
            None => WriteStatus::Failed("write task did not finish".into()),
        };
        tracing::debug!(sequence, ?status, "response write finished");
        on_done(sequence, status);
    }
}
