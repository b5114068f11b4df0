//! Fluent builders for declaring machines.
//!
//! [`LinearBuilder`] assembles the instruction list a linear
//! [`Template`](crate::linear::Template) is compiled from;
//! [`StateMachineBuilder`] declares the states and matcher entries of a
//! [`StateMachine`](crate::machine::StateMachine). Configuration mistakes
//! surface as [`BuildError`]s from `build()` rather than as runtime stalls.

pub mod error;
pub mod linear;
pub mod machine;

pub use error::BuildError;
pub use linear::LinearBuilder;
pub use machine::StateMachineBuilder;
