//! Stepper: a cooperative, tick-driven state machine runtime
//!
//! Stepper composes control flow out of declared instructions: tasks, timed
//! and conditional waits, sub-machines, bounded loops, branches, and
//! concurrently launched children. A declaration compiles once into an
//! immutable [`Template`] and is run by any number of independent instances,
//! each advanced one transition per [`update`](LinearStateMachine::update).
//! There are no threads and nothing blocks; "waiting" is a node that
//! declines to move on until its condition holds, and an external driver
//! supplies the ticks.
//!
//! # Core Concepts
//!
//! - **Template**: compiled, reusable instruction chain, built with
//!   [`LinearBuilder`] or [`compile`]
//! - **Instance**: one independently ticked run, spawned by
//!   [`Template::create_new`]
//! - **Tick**: one `update()` call, which performs one local transition and
//!   ticks each launched child once
//! - **Launch / await**: structured concurrency; an instance only finishes
//!   once its chain and every descendant are done
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use stepper::LinearBuilder;
//!
//! let log = Rc::new(RefCell::new(String::new()));
//! let tag = |c: char| {
//!     let log = Rc::clone(&log);
//!     move || log.borrow_mut().push(c)
//! };
//!
//! let template = LinearBuilder::new()
//!     .task(tag('a'))
//!     .task(tag('b'))
//!     .build()
//!     .expect("template compiles");
//!
//! let mut run = template.create_new();
//! while !run.is_finished() {
//!     run.update();
//! }
//! assert_eq!(log.borrow().as_str(), "ab");
//! ```

pub mod builder;
pub mod concurrent;
pub mod linear;
pub mod machine;

// Re-export the everyday surface.
pub use builder::{BuildError, LinearBuilder, StateMachineBuilder};
pub use concurrent::{Job, Ticker};
pub use linear::{compile, Awaitable, Instruction, LinearStateMachine, Template};
pub use machine::{LinkedStateMachine, StateMachine, StateRef};
