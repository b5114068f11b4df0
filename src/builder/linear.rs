//! Fluent declaration of linear templates.

use crate::builder::error::BuildError;
use crate::linear::{compile, Awaitable, Instruction, Template};

/// Builder assembling the instruction list a [`Template`] is compiled from.
///
/// Methods chain by value, in execution order. Nested blocks (`scope`,
/// `loop_while`, branch arms) take a closure that receives a fresh builder
/// and returns it filled in; a configuration mistake anywhere in the nesting
/// is deferred and surfaces as the outer [`build`](Self::build)'s error.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stepper::LinearBuilder;
///
/// let laps = Rc::new(Cell::new(0u32));
/// let template = LinearBuilder::new()
///     .task(|| println!("starting"))
///     .loop_while(
///         {
///             let laps = Rc::clone(&laps);
///             move || laps.get() < 2
///         },
///         |lap| {
///             lap.task({
///                 let laps = Rc::clone(&laps);
///                 move || laps.set(laps.get() + 1)
///             })
///         },
///     )
///     .build()
///     .unwrap();
///
/// let mut run = template.create_new();
/// while !run.is_finished() {
///     run.update();
/// }
/// assert_eq!(laps.get(), 2);
/// ```
pub struct LinearBuilder {
    instructions: Vec<Instruction>,
    error: Option<BuildError>,
}

impl LinearBuilder {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            error: None,
        }
    }

    /// Run a closure exactly once.
    pub fn task<F>(mut self, task: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.instructions.push(Instruction::task(task));
        self
    }

    /// Hold for the given number of milliseconds, measured from the tick the
    /// wait is first entered.
    pub fn wait_millis(mut self, millis: u64) -> Self {
        self.instructions.push(Instruction::wait_millis(millis));
        self
    }

    /// Hold until the predicate reads true; re-evaluated every tick.
    pub fn wait_until<P>(mut self, pred: P) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        self.instructions.push(Instruction::wait_until(pred));
        self
    }

    /// Drive a fresh clone of an already-built template to completion.
    pub fn run_machine(mut self, sub: Template) -> Self {
        self.instructions.push(Instruction::run_machine(sub));
        self
    }

    /// Declare an inline sub-machine and drive it to completion.
    pub fn scope<B>(mut self, body: B) -> Self
    where
        B: FnOnce(LinearBuilder) -> LinearBuilder,
    {
        match body(LinearBuilder::new()).build() {
            Ok(sub) => self.instructions.push(Instruction::run_machine(sub)),
            Err(error) => self.record(error),
        }
        self
    }

    /// While `cond` reads true, drive fresh clones of the body back to back.
    /// The condition is checked before the first iteration and again after
    /// each completed one.
    pub fn loop_while<P, B>(mut self, cond: P, body: B) -> Self
    where
        P: Fn() -> bool + 'static,
        B: FnOnce(LinearBuilder) -> LinearBuilder,
    {
        match body(LinearBuilder::new()).build() {
            Ok(template) => self.instructions.push(Instruction::loop_while(cond, template)),
            Err(error) => self.record(error),
        }
        self
    }

    /// Run `action` once per tick while `cond` reads true.
    pub fn loop_task_while<P, F>(mut self, cond: P, action: F) -> Self
    where
        P: Fn() -> bool + 'static,
        F: Fn() + 'static,
    {
        self.instructions
            .push(Instruction::loop_task_while(cond, action));
        self
    }

    /// Open a branch. Arm conditions are read once, when the branch is
    /// entered, and the first true arm is driven to completion.
    pub fn run_if<P, B>(mut self, cond: P, then: B) -> Self
    where
        P: Fn() -> bool + 'static,
        B: FnOnce(LinearBuilder) -> LinearBuilder,
    {
        match then(LinearBuilder::new()).build() {
            Ok(template) => self.instructions.push(Instruction::run_if(cond, template)),
            Err(error) => self.record(error),
        }
        self
    }

    /// Add a conditional arm to the branch opened by the nearest preceding
    /// [`run_if`](Self::run_if).
    pub fn elif<P, B>(mut self, cond: P, then: B) -> Self
    where
        P: Fn() -> bool + 'static,
        B: FnOnce(LinearBuilder) -> LinearBuilder,
    {
        match then(LinearBuilder::new()).build() {
            Ok(template) => self.instructions.push(Instruction::else_if(cond, template)),
            Err(error) => self.record(error),
        }
        self
    }

    /// Add the unconditional fallback arm to the branch opened by the
    /// nearest preceding [`run_if`](Self::run_if).
    pub fn else_run<B>(mut self, then: B) -> Self
    where
        B: FnOnce(LinearBuilder) -> LinearBuilder,
    {
        match then(LinearBuilder::new()).build() {
            Ok(template) => self.instructions.push(Instruction::else_run(template)),
            Err(error) => self.record(error),
        }
        self
    }

    /// Register a clone of `template` as a concurrent child and continue
    /// with the next instruction on the same tick. The returned handle feeds
    /// [`wait_for`](Self::wait_for).
    pub fn launch(mut self, template: Template) -> (Self, Awaitable) {
        let (instruction, handle) = Instruction::launch(template);
        self.instructions.push(instruction);
        (self, handle)
    }

    /// Hold until the launched child behind `handle` has finished.
    pub fn wait_for(mut self, handle: Awaitable) -> Self {
        self.instructions.push(Instruction::wait_for(handle));
        self
    }

    /// Compile the declared instructions into an immutable [`Template`].
    pub fn build(self) -> Result<Template, BuildError> {
        match self.error {
            Some(error) => Err(error),
            None => compile(self.instructions),
        }
    }

    fn record(&mut self, error: BuildError) {
        // First configuration mistake wins.
        self.error.get_or_insert(error);
    }
}

impl Default for LinearBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn an_empty_builder_produces_an_empty_template() {
        let template = LinearBuilder::default().build().unwrap();
        assert!(template.is_empty());
    }

    #[test]
    fn chained_declarations_compile_in_order() {
        let template = LinearBuilder::new()
            .task(|| ())
            .wait_until(|| true)
            .task(|| ())
            .build()
            .unwrap();
        assert_eq!(template.len(), 3);
    }

    #[test]
    fn elif_without_run_if_fails_the_build() {
        let result = LinearBuilder::new()
            .task(|| ())
            .elif(|| true, |arm| arm.task(|| ()))
            .build();
        assert!(matches!(result, Err(BuildError::DanglingBranch)));
    }

    #[test]
    fn nested_configuration_errors_surface_at_the_outer_build() {
        let result = LinearBuilder::new()
            .scope(|inner| inner.else_run(|arm| arm.task(|| ())))
            .task(|| ())
            .build();
        assert!(matches!(result, Err(BuildError::DanglingBranch)));
    }

    #[test]
    fn launch_hands_back_a_usable_handle() {
        let counter = Rc::new(Cell::new(0u32));
        let child = LinearBuilder::new()
            .task({
                let counter = Rc::clone(&counter);
                move || counter.set(counter.get() + 1)
            })
            .build()
            .unwrap();

        let (builder, handle) = LinearBuilder::new().launch(child);
        let template = builder.wait_for(handle).build().unwrap();

        let mut run = template.create_new();
        run.update();
        run.update();
        assert!(run.is_finished());
        assert_eq!(counter.get(), 1);
    }
}
