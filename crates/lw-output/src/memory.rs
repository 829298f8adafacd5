//! In-memory sink — keeps every record for later inspection.

use lw_core::ObserverId;

use crate::sink::EventSink;
use crate::{EventKind, EventRecord, OutputError, OutputResult};

/// Collects records in a `Vec`, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records:  Vec<EventRecord>,
    prologs:  Vec<ObserverId>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records of one kind, in write order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    /// Records written by one detector, in write order.
    pub fn for_detector<'a>(&'a self, detector: &'a str) -> impl Iterator<Item = &'a EventRecord> {
        self.records.iter().filter(move |r| r.detector.as_str() == detector)
    }

    /// Detector ids that announced themselves via `write_prolog`.
    pub fn prologs(&self) -> &[ObserverId] {
        &self.prologs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl EventSink for MemorySink {
    fn write_prolog(&mut self, detector: &ObserverId) -> OutputResult<()> {
        self.prologs.push(detector.clone());
        Ok(())
    }

    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
