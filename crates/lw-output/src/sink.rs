//! The `EventSink` trait implemented by every output backend.

use std::cell::RefCell;
use std::rc::Rc;

use lw_core::ObserverId;

use crate::{EventRecord, OutputError, OutputResult};

/// Receives detector events synchronously, one record per call.
///
/// Errors are returned to the calling detector and are never retried; the
/// detector propagates them so the step loop halts on the first failure.
pub trait EventSink {
    /// Called once when a detector writing to this sink is attached.
    fn write_prolog(&mut self, _detector: &ObserverId) -> OutputResult<()> {
        Ok(())
    }

    /// Write one finished event.
    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()>;

    /// Flush and close underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Several detectors commonly share one output file.  The step loop is
/// single-threaded, so shared ownership is an `Rc<RefCell<_>>`.
impl<S: EventSink + ?Sized> EventSink for Rc<RefCell<S>> {
    fn write_prolog(&mut self, detector: &ObserverId) -> OutputResult<()> {
        self.try_borrow_mut()
            .map_err(|_| OutputError::SinkBusy)?
            .write_prolog(detector)
    }

    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()> {
        self.try_borrow_mut()
            .map_err(|_| OutputError::SinkBusy)?
            .write_event(record)
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.try_borrow_mut()
            .map_err(|_| OutputError::SinkBusy)?
            .finish()
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn write_prolog(&mut self, detector: &ObserverId) -> OutputResult<()> {
        (**self).write_prolog(detector)
    }

    fn write_event(&mut self, record: &EventRecord) -> OutputResult<()> {
        (**self).write_event(record)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
