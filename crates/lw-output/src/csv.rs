//! CSV output backend.
//!
//! One row per event, header:
//! `detector,time,state,vehicle,numerical_id,speed,length,type,attribute,value`.
//! The attribute columns are empty when an event carries no attribute.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::sink::EventSink;
use crate::{EventRecord, OutputError, OutputResult};

/// Column names, in write order.
pub const CSV_HEADER: [&str; 10] = [
    "detector", "time", "state", "vehicle", "numerical_id",
    "speed", "length", "type", "attribute", "value",
];

/// Writes detector events as CSV rows.
///
/// Every row is flushed as soon as it is written so the file always reflects
/// every finalized event.
pub struct CsvSink<W: Write> {
    writer:   Writer<W>,
    finished: bool,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer and write the header row.
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer, finished: false })
    }

    /// Unwrap the inner writer (e.g. to inspect an in-memory buffer).
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> EventSink for CsvSink<W> {
    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let (attr_name, attr_value) = match record.attribute {
            Some(attr) => (attr.name.to_owned(), attr.value.to_string()),
            None       => (String::new(), String::new()),
        };
        self.writer.write_record(&[
            record.detector.to_string(),
            record.time.to_string(),
            record.kind.to_string(),
            record.vehicle.clone(),
            record.numerical_id.0.to_string(),
            record.speed.to_string(),
            record.length.to_string(),
            record.vehicle_type.clone(),
            attr_name,
            attr_value,
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
