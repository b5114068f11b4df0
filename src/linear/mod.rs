//! The linear machine: instructions, the compiler, templates, instances.
//!
//! A declared [`Instruction`] list is folded by [`compile`] into an
//! immutable [`Template`] whose chain ends in a distinguished end state.
//! [`Template::create_new`] spawns independent [`LinearStateMachine`]
//! instances that share the compiled nodes but keep their own cursor,
//! bookkeeping slots, and job tree, so any number of runs of one template
//! can be in flight at once without state bleeding between them.

mod compile;
mod instruction;
mod machine;
mod node;
mod vars;

pub use compile::compile;
pub use instruction::{Instruction, Predicate, TaskFn};
pub use machine::{Awaitable, LinearStateMachine, Template};
