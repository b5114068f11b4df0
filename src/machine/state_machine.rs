//! The label/matcher state machine.

use std::fmt;

use crate::machine::state_ref::StateRef;

pub(crate) type MatcherFn<T> = Box<dyn Fn(StateRef, &T) -> bool>;
pub(crate) type HandlerFn<T> = Box<dyn FnMut(StateRef, &T) -> StateRef>;

/// An ordered matcher/handler pair, as declared on the builder.
pub(crate) struct MatchEntry<T> {
    pub(crate) matcher: MatcherFn<T>,
    pub(crate) handler: HandlerFn<T>,
}

/// A state machine over labelled values, resolved by first-match.
///
/// Each state carries a value of `T`. On every [`update`](Self::update) the
/// machine scans its matcher entries in declaration order, runs the handler
/// of the first one matching the current state, and moves to the state the
/// handler returns. Matchers see live captured state, so which entry handles
/// a given state may legitimately change from one update to the next.
///
/// Built by [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
pub struct StateMachine<T> {
    id: u64,
    values: Vec<T>,
    entries: Vec<MatchEntry<T>>,
    current: StateRef,
}

impl<T> StateMachine<T> {
    pub(crate) fn new(
        id: u64,
        values: Vec<T>,
        entries: Vec<MatchEntry<T>>,
        starting: StateRef,
    ) -> Self {
        Self {
            id,
            values,
            entries,
            current: starting,
        }
    }

    /// The state the machine currently sits in.
    pub fn current_state(&self) -> StateRef {
        self.current
    }

    /// The value labelling the current state.
    pub fn current_value(&self) -> &T {
        &self.values[self.current.index()]
    }

    /// Resolve the current state against the declared matchers, run the
    /// winning handler, and move to the state it returns.
    ///
    /// # Panics
    ///
    /// Panics if no matcher accepts the current state, or if the handler
    /// returns a [`StateRef`] minted by a different builder.
    pub fn update(&mut self) {
        let current = self.current;
        let value = &self.values[current.index()];
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| (entry.matcher)(current, value))
            .unwrap_or_else(|| panic!("no matcher accepts the current state (state #{})", current.index()));

        let next = (entry.handler)(current, value);
        assert!(
            next.machine_id() == self.id,
            "handler returned a StateRef minted by a different builder"
        );
        self.current = next;
    }
}

impl<T: fmt::Debug> fmt::Debug for StateMachine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_value())
            .field("states", &self.values.len())
            .field("entries", &self.entries.len())
            .finish()
    }
}
