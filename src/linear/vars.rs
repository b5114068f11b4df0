//! Per-instance bookkeeping slots for stateful template nodes.
//!
//! Compiled nodes are shared by every instance of a template, so the
//! mutable state a node needs between ticks (a wait's start instant, a live
//! sub-machine, a launched child's finished flag) lives here instead: each
//! instance owns one [`VarStore`], and a node addresses its slot in whichever
//! store belongs to the instance being updated.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::linear::machine::LinearStateMachine;

static NEXT_SLOT: AtomicU64 = AtomicU64::new(0);

/// Identity of one stateful node's per-instance slot.
///
/// Ids come from a process-global counter, so a handle minted for one
/// template can never alias a slot belonging to another; resolving it
/// elsewhere simply reads absent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct SlotId(u64);

impl SlotId {
    pub(crate) fn next() -> Self {
        SlotId(NEXT_SLOT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Bookkeeping a node keeps between ticks of a single instance.
pub(crate) enum SlotValue {
    /// When a timed wait was first entered.
    Started(Instant),
    /// The live sub-machine a run/loop/branch node is driving.
    Running(Box<LinearStateMachine>),
    /// Finished flag of a child registered by a launch node.
    Launched(Rc<Cell<bool>>),
}

/// One instance's table of live slots.
///
/// An absent entry reads as the owning node's "not entered" default. Nodes
/// remove their slot when they transition on, so re-entry inside a loop
/// starts clean, and the owning machine purges the whole table once its end
/// state is reached.
pub(crate) struct VarStore {
    slots: HashMap<SlotId, SlotValue>,
}

impl VarStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Number of live slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn set(&mut self, id: SlotId, value: SlotValue) {
        self.slots.insert(id, value);
    }

    pub(crate) fn remove(&mut self, id: SlotId) {
        self.slots.remove(&id);
    }

    /// Clear every slot, returning how many were live.
    pub(crate) fn purge(&mut self) -> usize {
        let purged = self.slots.len();
        self.slots.clear();
        purged
    }

    /// Start instant recorded by a timed wait, if it has been entered.
    pub(crate) fn wait_start(&self, id: SlotId) -> Option<Instant> {
        match self.slots.get(&id) {
            Some(SlotValue::Started(start)) => Some(*start),
            _ => None,
        }
    }

    /// Remove and return the live sub-machine stored under `id`.
    ///
    /// The caller puts it back via [`set`](VarStore::set) while the
    /// sub-machine is still running. Slots are node-unique, so a mismatched
    /// variant cannot occur in correct use and reads as "not entered".
    pub(crate) fn take_running(&mut self, id: SlotId) -> Option<Box<LinearStateMachine>> {
        match self.slots.remove(&id) {
            Some(SlotValue::Running(machine)) => Some(machine),
            Some(other) => {
                self.slots.insert(id, other);
                None
            }
            None => None,
        }
    }

    /// Finished flag stored by a launch node, if any.
    pub(crate) fn launched_flag(&self, id: SlotId) -> Option<Rc<Cell<bool>>> {
        match self.slots.get(&id) {
            Some(SlotValue::Launched(flag)) => Some(Rc::clone(flag)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::compile;

    fn boxed_machine() -> Box<LinearStateMachine> {
        let template = compile(Vec::new()).expect("empty template compiles");
        Box::new(template.create_new())
    }

    #[test]
    fn absent_slots_read_as_defaults() {
        let mut store = VarStore::new();
        let id = SlotId::next();

        assert!(store.wait_start(id).is_none());
        assert!(store.take_running(id).is_none());
        assert!(store.launched_flag(id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn take_running_removes_until_put_back() {
        let mut store = VarStore::new();
        let id = SlotId::next();

        store.set(id, SlotValue::Running(boxed_machine()));
        assert_eq!(store.len(), 1);

        let machine = store.take_running(id).expect("slot was live");
        assert_eq!(store.len(), 0);

        store.set(id, SlotValue::Running(machine));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mismatched_variant_reads_as_absent_and_stays_live() {
        let mut store = VarStore::new();
        let id = SlotId::next();

        store.set(id, SlotValue::Started(Instant::now()));
        assert!(store.take_running(id).is_none());
        // The original slot survives the typed miss.
        assert!(store.wait_start(id).is_some());
    }

    #[test]
    fn purge_clears_everything_and_counts() {
        let mut store = VarStore::new();
        store.set(SlotId::next(), SlotValue::Started(Instant::now()));
        store.set(SlotId::next(), SlotValue::Running(boxed_machine()));
        store.set(
            SlotId::next(),
            SlotValue::Launched(Rc::new(Cell::new(false))),
        );

        assert_eq!(store.purge(), 3);
        assert_eq!(store.len(), 0);
        assert_eq!(store.purge(), 0);
    }

    #[test]
    fn slot_ids_are_globally_unique() {
        let a = SlotId::next();
        let b = SlotId::next();
        assert_ne!(a, b);
    }
}
