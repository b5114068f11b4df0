//! The unit of cooperatively scheduled work.

/// A completable unit of work that advances one step per tick.
///
/// Jobs never block and never run on their own: whoever owns a job is
/// responsible for ticking it until [`is_finished`](Job::is_finished)
/// reports `true`. Ticking a finished job must be a safe no-op.
///
/// [`LinearStateMachine`](crate::linear::LinearStateMachine) and
/// [`Ticker`](crate::concurrent::Ticker) both implement `Job`, which is what
/// lets launched machines nest arbitrarily deep while the root is driven by
/// a single poll loop.
///
/// # Example
///
/// ```rust
/// use stepper::concurrent::Job;
///
/// struct Countdown(u32);
///
/// impl Job for Countdown {
///     fn tick(&mut self) {
///         self.0 = self.0.saturating_sub(1);
///     }
///
///     fn is_finished(&self) -> bool {
///         self.0 == 0
///     }
/// }
///
/// let mut job = Countdown(2);
/// job.tick();
/// assert!(!job.is_finished());
/// job.tick();
/// assert!(job.is_finished());
/// ```
pub trait Job {
    /// Advance the job by exactly one step.
    fn tick(&mut self);

    /// Whether the job has completed all of its work.
    ///
    /// Once this returns `true` it must keep returning `true`.
    fn is_finished(&self) -> bool;
}
