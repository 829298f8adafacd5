//! `lw-output` — the Output Sink side of the lanewatch notification core.
//!
//! Detectors hand every finished event to an [`EventSink`] the moment it is
//! finalized.  Sinks never batch on the detector's behalf: a record is
//! either written or the error comes straight back to the detector, which
//! propagates it up through the step loop.
//!
//! | Feature   | Backend     | Files created            |
//! |-----------|-------------|--------------------------|
//! | *(none)*  | CSV         | any `io::Write` / a path |
//! | *(none)*  | Memory      | —                        |
//! | `sqlite`  | SQLite      | `detectors.db`           |
//!
//! # Usage
//!
//! ```rust,ignore
//! use lw_output::{CsvSink, EventSink};
//!
//! let mut sink = CsvSink::create(Path::new("./out/loops.csv"))?;
//! sink.write_event(&record)?;
//! sink.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod record;
pub mod sink;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use memory::MemorySink;
pub use record::{Attribute, EventKind, EventRecord};
pub use sink::EventSink;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;
