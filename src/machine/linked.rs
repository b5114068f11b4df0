//! Side-by-side composition of label/matcher machines.

use crate::machine::state_machine::StateMachine;

/// A set of machines advanced together by a single driver.
///
/// Each [`update`](Self::update) updates every composed machine exactly
/// once, in composition order, so the set stays in lockstep: no member can
/// get ahead of another between driver ticks.
pub struct LinkedStateMachine<T> {
    machines: Vec<StateMachine<T>>,
}

impl<T> LinkedStateMachine<T> {
    /// Compose a set of machines updated together, in the given order.
    pub fn new(machines: Vec<StateMachine<T>>) -> Self {
        Self { machines }
    }

    /// Append another machine to the end of the update order.
    pub fn push(mut self, machine: StateMachine<T>) -> Self {
        self.machines.push(machine);
        self
    }

    /// Append every machine of `other`, preserving both orders.
    pub fn merge(mut self, other: LinkedStateMachine<T>) -> Self {
        self.machines.extend(other.machines);
        self
    }

    /// Update every composed machine once, in order.
    pub fn update(&mut self) {
        for machine in &mut self.machines {
            machine.update();
        }
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// The composed machines, in update order.
    pub fn machines(&self) -> &[StateMachine<T>] {
        &self.machines
    }
}
