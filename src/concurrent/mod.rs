//! Structured concurrency for cooperatively ticked jobs.
//!
//! This module contains the job tree that backs `launch`/`wait_for`:
//! - The [`Job`] trait: anything that advances one step per `tick()` and
//!   reports a finished flag
//! - The [`Ticker`]: a per-instance tracker of launched child jobs that is
//!   finished only once every child is finished
//!
//! There is no preemption and no cancellation here. A job only ever makes
//! progress when its owner ticks it, and a job that never finishes keeps
//! every ancestor unfinished.

mod job;
mod ticker;

pub use job::Job;
pub use ticker::Ticker;
