//! Bookkeeping for requests the view has in flight.
//!
//! Refreshes (load and search) replace the displayed collection wholesale, so they
//! share one generation counter and only the newest one may touch state. Writes get
//! single-flight guards instead: a second submit while one is pending is refused.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum WriteSlot {
    /// Shared by JSON create and create-with-image.
    Create,
    Update,
    Delete(String),
}

#[derive(Debug, Default)]
pub(crate) struct FlightTracker {
    refresh_generation: u64,
    writes: HashSet<WriteSlot>,
    outstanding: usize,
}

impl FlightTracker {
    /// Issues the token for a new refresh, invalidating every earlier one.
    pub fn next_refresh(&mut self) -> u64 {
        self.refresh_generation += 1;
        self.refresh_generation
    }

    pub fn is_current_refresh(&self, generation: u64) -> bool {
        generation == self.refresh_generation
    }

    /// Claims a write slot. Returns `false` if it is already taken.
    pub fn try_claim(&mut self, slot: WriteSlot) -> bool {
        self.writes.insert(slot)
    }

    pub fn release(&mut self, slot: &WriteSlot) {
        self.writes.remove(slot);
    }

    pub fn task_started(&mut self) {
        self.outstanding += 1;
    }

    pub fn task_finished(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_refresh_invalidates_older() {
        let mut flights = FlightTracker::default();
        let first = flights.next_refresh();
        let second = flights.next_refresh();
        assert!(!flights.is_current_refresh(first));
        assert!(flights.is_current_refresh(second));
    }

    #[test]
    fn test_write_slot_is_single_flight() {
        let mut flights = FlightTracker::default();
        assert!(flights.try_claim(WriteSlot::Create));
        assert!(!flights.try_claim(WriteSlot::Create));
        assert!(flights.try_claim(WriteSlot::Update));
        flights.release(&WriteSlot::Create);
        assert!(flights.try_claim(WriteSlot::Create));
    }

    #[test]
    fn test_delete_slots_are_per_id() {
        let mut flights = FlightTracker::default();
        assert!(flights.try_claim(WriteSlot::Delete("1".into())));
        assert!(flights.try_claim(WriteSlot::Delete("2".into())));
        assert!(!flights.try_claim(WriteSlot::Delete("1".into())));
    }

    #[test]
    fn test_idle_tracking() {
        let mut flights = FlightTracker::default();
        assert!(flights.is_idle());
        flights.task_started();
        assert!(!flights.is_idle());
        flights.task_finished();
        flights.task_finished();
        assert!(flights.is_idle());
    }
}
