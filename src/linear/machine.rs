//! Compiled templates and their independently ticked instances.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use uuid::Uuid;

use crate::concurrent::{Job, Ticker};
use crate::linear::node::{advance, Link};
use crate::linear::vars::{SlotId, SlotValue, VarStore};

/// An immutable, compiled chain of transition nodes.
///
/// A template is produced once, by [`compile`](crate::linear::compile) or a
/// [`LinearBuilder`](crate::builder::LinearBuilder), and shared by every run
/// of it: [`create_new`](Template::create_new) spawns instances that point at
/// the same nodes but carry their own cursor, bookkeeping slots, and job
/// tree. Cloning a template is cheap and preserves its identity.
///
/// # Example
///
/// ```rust
/// use stepper::LinearBuilder;
///
/// let template = LinearBuilder::new()
///     .task(|| println!("hello"))
///     .build()
///     .unwrap();
///
/// let mut first = template.create_new();
/// let second = template.create_new();
/// first.update();
/// assert!(first.is_finished());
/// assert!(!second.is_finished());
/// ```
#[derive(Clone)]
pub struct Template {
    head: Link,
    nodes: usize,
    id: Uuid,
}

impl Template {
    pub(crate) fn new(head: Link, nodes: usize) -> Self {
        Self {
            head,
            nodes,
            id: Uuid::new_v4(),
        }
    }

    /// Number of compiled nodes in the chain. Branch arms fold into their
    /// opening node, so a whole `run_if`/`elif`/`else_run` group counts once.
    pub fn len(&self) -> usize {
        self.nodes
    }

    /// Whether the chain is empty. An empty template's instances finish on
    /// their first update.
    pub fn is_empty(&self) -> bool {
        self.nodes == 0
    }

    /// Identity of this compiled template, shared by clones of it.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Spawn an independent instance positioned at the head of the chain.
    pub fn create_new(&self) -> LinearStateMachine {
        let machine = LinearStateMachine {
            template: self.clone(),
            cursor: self.head.clone(),
            vars: VarStore::new(),
            ticker: Ticker::new(),
            finished: false,
            end_reached: false,
            instance: Uuid::new_v4(),
        };
        trace!(template = %self.id, instance = %machine.instance, "instance spawned");
        machine
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// One independently ticked run of a [`Template`].
///
/// An instance is advanced exclusively by [`update`](Self::update); there is
/// no run loop of its own and nothing ever blocks. Waiting is a node that
/// declines to move on until its condition holds, so an external driver
/// (a frame loop, a scheduler, a parent machine) supplies the ticks.
pub struct LinearStateMachine {
    template: Template,
    cursor: Link,
    vars: VarStore,
    ticker: Ticker,
    finished: bool,
    end_reached: bool,
    instance: Uuid,
}

impl LinearStateMachine {
    /// Advance the instance by one tick.
    ///
    /// A tick performs, in order: one local transition of the chain cursor
    /// (plus any launch fall-throughs), then one tick of every directly
    /// launched child. The instance becomes finished on the first tick at
    /// which the cursor sits at the end of the chain and every descendant
    /// has finished; all bookkeeping slots are purged the moment the end is
    /// reached. Further calls after that are no-ops.
    pub fn update(&mut self) {
        if self.finished {
            return;
        }

        if !self.cursor.is_end() {
            self.cursor = advance(self.instance, &self.cursor, &mut self.vars, &mut self.ticker);
        }

        self.ticker.tick();

        if self.cursor.is_end() {
            if !self.end_reached {
                self.end_reached = true;
                let purged = self.vars.purge();
                trace!(instance = %self.instance, purged, "instance slots purged");
            }
            if self.ticker.is_finished() {
                self.finished = true;
                trace!(instance = %self.instance, "machine finished");
            }
        }
    }

    /// Whether the chain and every launched descendant have completed.
    /// Monotonic: once `true`, it never reverts.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Spawn a fresh sibling instance of this machine's template.
    pub fn create_new(&self) -> LinearStateMachine {
        self.template.create_new()
    }

    /// Register a clone of `template` as a concurrent child of this
    /// instance, ticked once per [`update`](Self::update) from now on.
    ///
    /// The returned [`Awaitable`] resolves against this instance. The child
    /// counts towards completion: the instance is not finished until the
    /// child is.
    ///
    /// # Panics
    ///
    /// Panics if this instance's own chain has already completed; a child
    /// registered that late could never be awaited.
    pub fn launch(&mut self, template: &Template) -> Awaitable {
        assert!(
            !self.end_reached && !self.finished,
            "launch is only valid while the machine's chain is still running"
        );
        let child = template.create_new();
        let flag = Rc::new(Cell::new(false));
        let slot = SlotId::next();
        self.vars.set(slot, SlotValue::Launched(Rc::clone(&flag)));
        trace!(parent = %self.instance, child = %child.instance_id(), "child launched");
        self.ticker.add_watched(Box::new(child), flag);
        Awaitable::new(slot)
    }

    /// Number of live bookkeeping slots. Zero before the first stateful node
    /// is entered and again once the instance reaches the end of its chain.
    pub fn live_vars(&self) -> usize {
        self.vars.len()
    }

    /// Identity of this run, distinct across all instances.
    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    /// Identity of the template this run was spawned from.
    pub fn template_id(&self) -> Uuid {
        self.template.id()
    }
}

impl Job for LinearStateMachine {
    fn tick(&mut self) {
        self.update();
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl fmt::Debug for LinearStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearStateMachine")
            .field("instance", &self.instance)
            .field("template", &self.template.id())
            .field("finished", &self.finished)
            .field("live_vars", &self.vars.len())
            .finish()
    }
}

/// Read-only handle to a launched child's finished flag.
///
/// A handle is minted when the launch is declared and resolves lazily,
/// against a concrete instance: each run of the template stores its own
/// child's flag under the handle's slot. Resolving a handle against an
/// instance that never executed its launch reads `false`.
///
/// Once the owning instance itself finishes, its bookkeeping is purged and
/// the handle reads `false` again; a finished machine implies every child it
/// launched finished first.
///
/// # Example
///
/// ```rust
/// use stepper::LinearBuilder;
///
/// let child = LinearBuilder::new().task(|| ()).build().unwrap();
/// let (builder, handle) = LinearBuilder::new().launch(child);
/// let template = builder.wait_for(handle).build().unwrap();
///
/// let mut run = template.create_new();
/// run.update(); // launch falls through; the child runs to completion
/// assert!(handle.is_finished(&run));
/// run.update(); // wait_for observes the finished child
/// assert!(run.is_finished());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Awaitable {
    slot: SlotId,
}

impl Awaitable {
    pub(crate) fn new(slot: SlotId) -> Self {
        Self { slot }
    }

    pub(crate) fn slot(&self) -> SlotId {
        self.slot
    }

    /// Whether the child this handle references has finished, resolved
    /// against `instance`'s own bookkeeping.
    pub fn is_finished(&self, instance: &LinearStateMachine) -> bool {
        instance
            .vars
            .launched_flag(self.slot)
            .is_some_and(|flag| flag.get())
    }
}
