//! SQLite output backend (feature `sqlite`).
//!
//! Creates `detectors.db` in the configured directory with two tables:
//! `detectors` (one row per announced detector) and `detector_events`.

use std::path::Path;

use lw_core::ObserverId;
use rusqlite::Connection;

use crate::sink::EventSink;
use crate::{EventRecord, OutputError, OutputResult};

/// Writes detector events to an SQLite database, one `INSERT` per event.
pub struct SqliteSink {
    conn:     Connection,
    finished: bool,
}

impl SqliteSink {
    /// Open (or create) `detectors.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("detectors.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS detectors (
                 id TEXT PRIMARY KEY
             );
             CREATE TABLE IF NOT EXISTS detector_events (
                 detector     TEXT    NOT NULL,
                 time         REAL    NOT NULL,
                 state        TEXT    NOT NULL,
                 vehicle      TEXT    NOT NULL,
                 numerical_id INTEGER NOT NULL,
                 speed        REAL    NOT NULL,
                 length       REAL    NOT NULL,
                 type         TEXT    NOT NULL,
                 attribute    TEXT,
                 value        REAL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl EventSink for SqliteSink {
    fn write_prolog(&mut self, detector: &ObserverId) -> OutputResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO detectors (id) VALUES (?1)",
            rusqlite::params![detector.as_str()],
        )?;
        Ok(())
    }

    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO detector_events \
             (detector, time, state, vehicle, numerical_id, speed, length, type, attribute, value) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        stmt.execute(rusqlite::params![
            record.detector.as_str(),
            record.time,
            record.kind.as_str(),
            record.vehicle,
            record.numerical_id.0 as i64,
            record.speed,
            record.length,
            record.vehicle_type,
            record.attribute.map(|a| a.name),
            record.attribute.map(|a| a.value),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
