//! Tracker for concurrently progressing child jobs.

use std::cell::Cell;
use std::rc::Rc;

use super::job::Job;

struct Child {
    job: Box<dyn Job>,
    /// Shared mirror of the child's finished flag, refreshed after each
    /// tick. `wait_for` handles read it without access to the job itself.
    flag: Option<Rc<Cell<bool>>>,
}

/// Owns zero or more child [`Job`]s and advances them in lockstep.
///
/// A `Ticker` is finished iff every child is finished, vacuously true while
/// it owns none. The flag is computed on every call rather than latched, so
/// a job registered after an idle stretch is still waited on. Children are
/// ticked in registration order, one tick each per [`tick`](Ticker::tick);
/// nothing is ever drained to completion within a single call.
///
/// `Ticker` implements `Job` itself, so tickers nest: a child machine owns
/// its own ticker, and the root only settles once the whole tree has.
///
/// # Example
///
/// ```rust
/// use stepper::concurrent::{Job, Ticker};
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
/// let mut ticker = Ticker::new();
/// assert!(ticker.is_finished()); // no children yet
///
/// ticker.add_job(Box::new(Countdown(2)));
/// ticker.add_job(Box::new(Countdown(1)));
/// assert!(!ticker.is_finished());
///
/// ticker.tick();
/// ticker.tick();
/// assert!(ticker.is_finished());
/// ```
pub struct Ticker {
    children: Vec<Child>,
}

impl Ticker {
    /// Create a ticker with no children.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Register a child job. It will be ticked once per [`tick`](Ticker::tick)
    /// from now on, after previously registered children.
    pub fn add_job(&mut self, job: Box<dyn Job>) {
        self.children.push(Child { job, flag: None });
    }

    /// Register a child job together with a shared finished-flag mirror.
    pub(crate) fn add_watched(&mut self, job: Box<dyn Job>, flag: Rc<Cell<bool>>) {
        flag.set(job.is_finished());
        self.children.push(Child {
            job,
            flag: Some(flag),
        });
    }

    /// Number of registered children, finished ones included.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether no children have been registered.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Advance every child by exactly one tick, in registration order.
    pub fn tick(&mut self) {
        for child in &mut self.children {
            child.job.tick();
            if let Some(flag) = &child.flag {
                flag.set(child.job.is_finished());
            }
        }
    }

    /// Whether all children are finished (vacuously true with none).
    pub fn is_finished(&self) -> bool {
        self.children.iter().all(|child| child.job.is_finished())
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Job for Ticker {
    fn tick(&mut self) {
        Ticker::tick(self)
    }

    fn is_finished(&self) -> bool {
        Ticker::is_finished(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        remaining: u32,
    }

    impl Countdown {
        fn new(remaining: u32) -> Self {
            Self { remaining }
        }
    }

    impl Job for Countdown {
        fn tick(&mut self) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn is_finished(&self) -> bool {
            self.remaining == 0
        }
    }

    #[test]
    fn empty_ticker_is_vacuously_finished() {
        let ticker = Ticker::new();
        assert!(ticker.is_finished());
        assert!(ticker.is_empty());
        assert_eq!(ticker.len(), 0);
    }

    #[test]
    fn finished_is_recomputed_after_late_registration() {
        let mut ticker = Ticker::new();
        ticker.tick();
        assert!(ticker.is_finished());

        // A child added after the idle ticks must still hold completion back.
        ticker.add_job(Box::new(Countdown::new(2)));
        assert!(!ticker.is_finished());

        ticker.tick();
        assert!(!ticker.is_finished());
        ticker.tick();
        assert!(ticker.is_finished());
    }

    #[test]
    fn each_child_gets_exactly_one_tick_per_call() {
        let mut ticker = Ticker::new();
        ticker.add_job(Box::new(Countdown::new(3)));
        ticker.add_job(Box::new(Countdown::new(1)));

        ticker.tick();
        ticker.tick();
        ticker.tick();
        assert!(ticker.is_finished());
    }

    #[test]
    fn watched_flag_mirrors_child_completion() {
        let mut ticker = Ticker::new();
        let flag = Rc::new(Cell::new(false));
        ticker.add_watched(Box::new(Countdown::new(2)), Rc::clone(&flag));

        assert!(!flag.get());
        ticker.tick();
        assert!(!flag.get());
        ticker.tick();
        assert!(flag.get());
        assert!(ticker.is_finished());
    }

    #[test]
    fn tickers_nest_transitively() {
        let mut inner = Ticker::new();
        inner.add_job(Box::new(Countdown::new(2)));

        let mut outer = Ticker::new();
        outer.add_job(Box::new(inner));
        outer.add_job(Box::new(Countdown::new(1)));

        assert!(!outer.is_finished());
        outer.tick();
        assert!(!outer.is_finished());
        outer.tick();
        assert!(outer.is_finished());
    }
}
