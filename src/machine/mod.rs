//! The label/matcher state machine and its side-by-side composition.
//!
//! Where the linear machine fixes its whole course at compile time, a
//! [`StateMachine`] is open-ended: it hops between declared states for as
//! long as its driver keeps updating it, resolving the handler for the
//! current state against live matcher predicates on every tick. A
//! [`LinkedStateMachine`] advances several of them in lockstep.

mod linked;
mod state_machine;
mod state_ref;

pub use linked::LinkedStateMachine;
pub use state_machine::StateMachine;
pub use state_ref::StateRef;

pub(crate) use state_machine::{HandlerFn, MatchEntry, MatcherFn};
pub(crate) use state_ref::next_machine_id;
