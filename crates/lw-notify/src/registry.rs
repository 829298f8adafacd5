//! `LaneObservers` — the observers attached to one lane, in dispatch order.

use std::cmp::Ordering;

use lw_core::{LaneId, ObserverId, Vehicle};
use tracing::warn;

use crate::{
    EnterReason, LeaveReason, MoveObserver, NotifyResult, StepContext, assert_forward_motion,
};

/// One lane attachment: an observer and its longitudinal offset.
struct Attachment {
    position: f64,
    observer: Box<dyn MoveObserver>,
}

impl Attachment {
    fn key_cmp(&self, position: f64, id: &ObserverId) -> Ordering {
        self.position
            .total_cmp(&position)
            .then_with(|| self.observer.id().cmp(id))
    }
}

/// Observers registered on a lane.
///
/// Entries are kept sorted by ascending position, then identity, which is
/// the order every notification is delivered in.  Registration is idempotent
/// per identity: attaching an id that is already present replaces the old
/// instance (and its internal state) instead of adding a second one.
///
/// Per-vehicle contact lists are owned by the motion source and passed into
/// the `notify_*` methods; this type holds no per-vehicle state itself.
#[derive(Default)]
pub struct LaneObservers {
    entries: Vec<Attachment>,
}

impl LaneObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach `observer` at `position`, returning the instance it replaced.
    pub fn attach(
        &mut self,
        position: f64,
        observer: Box<dyn MoveObserver>,
    ) -> Option<Box<dyn MoveObserver>> {
        let replaced = self.detach(observer.id());
        if replaced.is_some() {
            warn!(observer = %observer.id(), "re-registered observer replaces prior attachment");
        }
        let at = self
            .entries
            .partition_point(|e| e.key_cmp(position, observer.id()) == Ordering::Less);
        self.entries.insert(at, Attachment { position, observer });
        replaced
    }

    /// Remove the observer with `id`, if present.
    pub fn detach(&mut self, id: &ObserverId) -> Option<Box<dyn MoveObserver>> {
        let at = self.entries.iter().position(|e| e.observer.id() == id)?;
        Some(self.entries.remove(at).observer)
    }

    pub fn contains(&self, id: &ObserverId) -> bool {
        self.entries.iter().any(|e| e.observer.id() == id)
    }

    /// Monitored position of the observer with `id`.
    pub fn position_of(&self, id: &ObserverId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.observer.id() == id)
            .map(|e| e.position)
    }

    /// Observer ids in dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = &ObserverId> {
        self.entries.iter().map(|e| e.observer.id())
    }

    fn find_mut(&mut self, id: &ObserverId) -> Option<&mut Box<dyn MoveObserver>> {
        self.entries
            .iter_mut()
            .find(|e| e.observer.id() == id)
            .map(|e| &mut e.observer)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Offer first contact to every observer on the lane.
    ///
    /// Returns the ids that accepted, in dispatch order.  The caller keeps
    /// this list as the vehicle's contact set for the lane.
    pub fn notify_enter(
        &mut self,
        vehicle: &dyn Vehicle,
        reason:  EnterReason,
        ctx:     &StepContext,
    ) -> NotifyResult<Vec<ObserverId>> {
        let mut contacts = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            if entry.observer.on_enter(vehicle, reason, ctx)? {
                contacts.push(entry.observer.id().clone());
            }
        }
        Ok(contacts)
    }

    /// Deliver one step of motion to every observer in `contacts`.
    ///
    /// Observers that return `false` are removed from `contacts`.  Ids that
    /// are no longer attached (replaced or detached) are dropped silently.
    pub fn notify_move(
        &mut self,
        contacts:  &mut Vec<ObserverId>,
        vehicle:   &dyn Vehicle,
        old_pos:   f64,
        new_pos:   f64,
        new_speed: f64,
        ctx:       &StepContext,
    ) -> NotifyResult<()> {
        assert_forward_motion(vehicle, old_pos, new_pos);
        let mut i = 0;
        while i < contacts.len() {
            let keep = match self.find_mut(&contacts[i]) {
                Some(observer) => observer.on_move(vehicle, old_pos, new_pos, new_speed, ctx)?,
                None => false,
            };
            if keep {
                i += 1;
            } else {
                contacts.remove(i);
            }
        }
        Ok(())
    }

    /// End contact for every observer in `contacts`.
    ///
    /// Returns the number of observers that acknowledged the leave.
    pub fn notify_leave(
        &mut self,
        contacts:     Vec<ObserverId>,
        vehicle:      &dyn Vehicle,
        last_pos:     f64,
        reason:       LeaveReason,
        entered_lane: Option<LaneId>,
        ctx:          &StepContext,
    ) -> NotifyResult<usize> {
        let mut acknowledged = 0;
        for id in contacts {
            let Some(observer) = self.find_mut(&id) else {
                continue;
            };
            if observer.on_leave(vehicle, last_pos, reason, entered_lane, ctx)? {
                acknowledged += 1;
            }
        }
        Ok(acknowledged)
    }

    /// Total per-vehicle entries still held by the lane's observers.
    pub fn open_entries(&self) -> usize {
        self.entries.iter().map(|e| e.observer.open_entries()).sum()
    }

    /// Call [`MoveObserver::close`] on every observer, in dispatch order.
    pub fn close_all(&mut self) -> NotifyResult<()> {
        for entry in &mut self.entries {
            entry.observer.close()?;
        }
        Ok(())
    }
}
