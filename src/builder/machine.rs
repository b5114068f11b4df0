//! Builder for the label/matcher state machine.

use std::fmt;

use crate::builder::error::BuildError;
use crate::machine::{next_machine_id, HandlerFn, MatchEntry, MatcherFn, StateMachine, StateRef};

/// Builder declaring the states and matcher/handler entries of a
/// [`StateMachine`].
///
/// States are minted with [`create_state`](Self::create_state) and referred
/// to by the returned [`StateRef`]. Handlers are registered against a single
/// state ([`on_run`](Self::on_run)), a predicate ([`when`](Self::when)), or
/// everything ([`all_states`](Self::all_states)); at run time the first
/// matching entry, in declaration order, handles the current state.
///
/// # Example
///
/// ```rust
/// use stepper::StateMachineBuilder;
///
/// let mut builder = StateMachineBuilder::new();
/// let idle = builder.create_state("idle");
/// let busy = builder.create_state("busy");
/// builder.on_run(idle, move |_, _| busy);
/// builder.on_run(busy, move |_, _| idle);
/// builder.starting_state(idle);
///
/// let mut machine = builder.build().unwrap();
/// machine.update();
/// assert_eq!(*machine.current_value(), "busy");
/// ```
pub struct StateMachineBuilder<T> {
    id: u64,
    values: Vec<T>,
    entries: Vec<MatchEntry<T>>,
    starting: Option<StateRef>,
}

impl<T> StateMachineBuilder<T> {
    pub fn new() -> Self {
        Self {
            id: next_machine_id(),
            values: Vec::new(),
            entries: Vec::new(),
            starting: None,
        }
    }

    /// Declare a state labelled with `value` and mint its reference.
    pub fn create_state(&mut self, value: T) -> StateRef {
        let state = StateRef::new(self.id, self.values.len());
        self.values.push(value);
        state
    }

    /// Register a handler for exactly one state.
    ///
    /// The handler receives the current state's ref and value and returns
    /// the state to move to; returning the received ref stays put.
    pub fn on_run<H>(&mut self, state: StateRef, handler: H)
    where
        H: FnMut(StateRef, &T) -> StateRef + 'static,
    {
        self.check_ref(state);
        let matcher: MatcherFn<T> = Box::new(move |current, _| current == state);
        self.push_entry(matcher, Box::new(handler));
    }

    /// Register a handler for every state the predicate accepts. The
    /// predicate is consulted live, on each update.
    pub fn when<P, H>(&mut self, predicate: P, handler: H)
    where
        P: Fn(StateRef, &T) -> bool + 'static,
        H: FnMut(StateRef, &T) -> StateRef + 'static,
    {
        self.push_entry(Box::new(predicate), Box::new(handler));
    }

    /// Register a catch-all handler. Declared last, it acts as the default;
    /// declared earlier, it shadows every later entry.
    pub fn all_states<H>(&mut self, handler: H)
    where
        H: FnMut(StateRef, &T) -> StateRef + 'static,
    {
        self.push_entry(Box::new(|_, _| true), Box::new(handler));
    }

    /// Set the state the machine starts in (required).
    pub fn starting_state(&mut self, state: StateRef) {
        self.check_ref(state);
        self.starting = Some(state);
    }

    /// Build the machine.
    ///
    /// Fails if no starting state was set, or if some declared state is
    /// accepted by no matcher as currently captured.
    pub fn build(self) -> Result<StateMachine<T>, BuildError>
    where
        T: fmt::Debug,
    {
        let starting = self.starting.ok_or(BuildError::MissingStartingState)?;

        for (index, value) in self.values.iter().enumerate() {
            let state = StateRef::new(self.id, index);
            if !self
                .entries
                .iter()
                .any(|entry| (entry.matcher)(state, value))
            {
                return Err(BuildError::UnhandledState(format!("{value:?}")));
            }
        }

        Ok(StateMachine::new(self.id, self.values, self.entries, starting))
    }

    fn push_entry(&mut self, matcher: MatcherFn<T>, handler: HandlerFn<T>) {
        self.entries.push(MatchEntry { matcher, handler });
    }

    fn check_ref(&self, state: StateRef) {
        assert!(
            state.machine_id() == self.id,
            "StateRef was minted by a different builder"
        );
    }
}

impl<T> Default for StateMachineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_a_starting_state() {
        let mut builder = StateMachineBuilder::new();
        let only = builder.create_state(0);
        builder.on_run(only, move |me, _| me);

        let result = builder.build();
        assert!(matches!(result, Err(BuildError::MissingStartingState)));
    }

    #[test]
    fn every_state_needs_a_matching_handler() {
        let mut builder = StateMachineBuilder::new();
        let covered = builder.create_state(0);
        let _uncovered = builder.create_state(1);
        builder.on_run(covered, move |me, _| me);
        builder.starting_state(covered);

        let result = builder.build();
        assert!(matches!(result, Err(BuildError::UnhandledState(ref s)) if s == "1"));
    }

    #[test]
    fn a_catch_all_covers_every_state() {
        let mut builder = StateMachineBuilder::new();
        let a = builder.create_state('a');
        let _b = builder.create_state('b');
        builder.all_states(move |me, _| me);
        builder.starting_state(a);

        assert!(builder.build().is_ok());
    }

    #[test]
    #[should_panic(expected = "different builder")]
    fn registering_a_foreign_ref_panics() {
        let mut other = StateMachineBuilder::new();
        let foreign = other.create_state(0);

        let mut builder = StateMachineBuilder::new();
        let _local = builder.create_state(0);
        builder.on_run(foreign, move |me, _| me);
    }
}
