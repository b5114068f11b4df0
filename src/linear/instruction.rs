//! The declared operations a linear template is compiled from.

use crate::linear::machine::{Awaitable, Template};
use crate::linear::vars::SlotId;

/// A task body. Captured state is owned by the closure; shared mutation goes
/// through `Rc<Cell<_>>` or `Rc<RefCell<_>>`.
pub type TaskFn = Box<dyn Fn()>;

/// A condition polled by waits, loops, and branches.
pub type Predicate = Box<dyn Fn() -> bool>;

/// One declared step of a linear machine.
///
/// An ordered `Vec<Instruction>` is what [`compile`](crate::linear::compile)
/// consumes; [`LinearBuilder`](crate::builder::LinearBuilder) is sugar for
/// assembling one. The constructors below box the closures so call sites
/// stay unannotated.
pub enum Instruction {
    /// Run a closure exactly once, then move on.
    Task(TaskFn),
    /// Hold until the given number of milliseconds has elapsed since the
    /// node was first entered.
    WaitMillis(u64),
    /// Hold until the predicate reads true; re-evaluated every tick.
    WaitUntil(Predicate),
    /// Drive a fresh clone of the sub-template to completion, one tick per
    /// tick, then move on.
    RunMachine(Template),
    /// While `cond` reads true, drive fresh clones of `body` back to back;
    /// `cond` is re-read before the first iteration and after each one.
    LoopWhile { cond: Predicate, body: Template },
    /// Run `action` once per tick while `cond` reads true.
    LoopTask { cond: Predicate, action: TaskFn },
    /// Open a branch: the first arm whose condition reads true on entry is
    /// driven to completion, the others never start.
    RunIf { cond: Predicate, then: Template },
    /// Additional conditional arm of the nearest preceding [`RunIf`](Self::RunIf).
    ElseIf { cond: Predicate, then: Template },
    /// Unconditional fallback arm of the nearest preceding [`RunIf`](Self::RunIf).
    Else { then: Template },
    /// Register a clone of the template as a concurrent child and continue
    /// with the next instruction on the same tick.
    Launch { template: Template, handle: Awaitable },
    /// Hold until the child behind the handle has finished.
    Await(Awaitable),
}

impl Instruction {
    pub fn task<F>(task: F) -> Self
    where
        F: Fn() + 'static,
    {
        Instruction::Task(Box::new(task))
    }

    pub fn wait_millis(millis: u64) -> Self {
        Instruction::WaitMillis(millis)
    }

    pub fn wait_until<P>(pred: P) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        Instruction::WaitUntil(Box::new(pred))
    }

    pub fn run_machine(sub: Template) -> Self {
        Instruction::RunMachine(sub)
    }

    pub fn loop_while<P>(cond: P, body: Template) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        Instruction::LoopWhile {
            cond: Box::new(cond),
            body,
        }
    }

    pub fn loop_task_while<P, F>(cond: P, action: F) -> Self
    where
        P: Fn() -> bool + 'static,
        F: Fn() + 'static,
    {
        Instruction::LoopTask {
            cond: Box::new(cond),
            action: Box::new(action),
        }
    }

    pub fn run_if<P>(cond: P, then: Template) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        Instruction::RunIf {
            cond: Box::new(cond),
            then,
        }
    }

    pub fn else_if<P>(cond: P, then: Template) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        Instruction::ElseIf {
            cond: Box::new(cond),
            then,
        }
    }

    pub fn else_run(then: Template) -> Self {
        Instruction::Else { then }
    }

    /// Declare a launch and mint the handle its children report through.
    pub fn launch(template: Template) -> (Self, Awaitable) {
        let handle = Awaitable::new(SlotId::next());
        (Instruction::Launch { template, handle }, handle)
    }

    pub fn wait_for(handle: Awaitable) -> Self {
        Instruction::Await(handle)
    }
}
