//! One participant session: the engine, the chart data and the response log.
//!
//! The in-memory log is updated before anything is handed to the remote sink,
//! and nothing the sink reports can roll it back.

use api::{ChartDataset, ResponseRecord};
use time::{macros::format_description, OffsetDateTime};

use crate::core::config::TaskConfig;
use crate::core::timing::InstantStamp;

use super::driver::TickControl;
use super::engine::{Action, ChartEngine, Transition};
use super::metrics::ResponseSummary;

/// Append-only record of every completed trial, seeded from the remote sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseLog {
    records: Vec<ResponseRecord>,
}

impl ResponseLog {
    pub fn new(records: Vec<ResponseRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: ResponseRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Option<ResponseSummary> {
        ResponseSummary::from_records(&self.records)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Pending,
    Saved,
    Failed(String),
}

/// Most recent completion, kept for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct LastWrite {
    /// 1-based position of the record in the log.
    pub sequence: usize,
    pub record: ResponseRecord,
    pub recorded_at: String,
    pub status: WriteStatus,
}

/// Receives each completed record after it is in the local log.
pub trait ResponseSink {
    fn submit(&self, sequence: usize, record: &ResponseRecord, log: &ResponseLog) -> WriteStatus;
}

/// Keeps everything local. Used when no connection could be opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ResponseSink for DiscardSink {
    fn submit(&self, _: usize, _: &ResponseRecord, _: &ResponseLog) -> WriteStatus {
        WriteStatus::Failed("no data connection".into())
    }
}

pub(crate) fn write_status(sequence: usize, result: Result<(), api::GatewayError>) -> WriteStatus {
    match result {
        Ok(()) => WriteStatus::Saved,
        Err(err) => {
            tracing::warn!(sequence, %err, "response kept locally; remote write failed");
            WriteStatus::Failed(err.to_string())
        }
    }
}

pub struct ChartSession {
    pub engine: ChartEngine,
    pub config: TaskConfig,
    dataset: ChartDataset,
    log: ResponseLog,
    last_write: Option<LastWrite>,
    sink: Box<dyn ResponseSink>,
}

impl ChartSession {
    pub fn new(
        config: TaskConfig,
        dataset: ChartDataset,
        responses: Vec<ResponseRecord>,
        sink: Box<dyn ResponseSink>,
    ) -> Self {
        Self {
            engine: ChartEngine::new(&config),
            config,
            dataset,
            log: ResponseLog::new(responses),
            last_write: None,
            sink,
        }
    }

    pub fn dataset(&self) -> &ChartDataset {
        &self.dataset
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    pub fn last_write(&self) -> Option<&LastWrite> {
        self.last_write.as_ref()
    }

    /// True while a chart is on screen and the clock is running. Anything that
    /// remounts the task view in this state abandons the trial.
    pub fn trial_in_progress(&self) -> bool {
        self.engine.is_running()
    }

    pub fn dispatch(&mut self, action: Action, now: InstantStamp) -> Transition {
        let transition = self.engine.dispatch(action, now);
        if let Transition::Completed(done) = &transition {
            self.record(done.record);
        }
        transition
    }

    /// Tick on behalf of the loop started for `trial_id`.
    pub fn tick_for(&mut self, trial_id: u64, now: InstantStamp) -> TickControl {
        if self.engine.trial_id != trial_id || !self.engine.is_running() {
            return TickControl::Stop;
        }
        self.engine.tick(now);
        TickControl::Continue
    }

    /// Update the status of a write that finished after `dispatch` returned.
    pub fn mark_write(&mut self, sequence: usize, status: WriteStatus) {
        if let Some(last) = self
            .last_write
            .as_mut()
            .filter(|last| last.sequence == sequence)
        {
            last.status = status;
        }
    }

    fn record(&mut self, record: ResponseRecord) {
        self.log.push(record);
        let sequence = self.log.len();
        self.last_write = Some(LastWrite {
            sequence,
            record,
            recorded_at: clock_label(),
            status: WriteStatus::Pending,
        });

        let status = self.sink.submit(sequence, &record, &self.log);
        self.mark_write(sequence, status);
    }
}

fn clock_label() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| "—".to_string())
}
