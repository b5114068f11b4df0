//! Branded references to declared states.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MACHINE: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_machine_id() -> u64 {
    NEXT_MACHINE.fetch_add(1, Ordering::Relaxed)
}

/// An opaque reference to one declared state of one machine.
///
/// Refs are minted by
/// [`StateMachineBuilder::create_state`](crate::builder::StateMachineBuilder::create_state)
/// and carry the identity of the builder that made them, so a ref can never
/// be smuggled into a machine it does not belong to: feeding a foreign ref
/// to a builder or returning one from a handler panics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StateRef {
    machine: u64,
    index: usize,
}

impl StateRef {
    pub(crate) fn new(machine: u64, index: usize) -> Self {
        Self { machine, index }
    }

    pub(crate) fn machine_id(&self) -> u64 {
        self.machine
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}
