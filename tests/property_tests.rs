//! Property-based tests for the linear runtime.
//!
//! These tests use proptest to verify tick-level guarantees across many
//! generated machine shapes. Waits are zero-length where used, so every
//! property below has an exact, deterministic tick count.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use stepper::{LinearBuilder, LinearStateMachine};

/// Drive `machine` to completion, returning how many updates it took.
fn drive(machine: &mut LinearStateMachine, cap: usize) -> usize {
    let mut ticks = 0;
    while !machine.is_finished() {
        assert!(ticks < cap, "machine did not finish within {cap} ticks");
        machine.update();
        ticks += 1;
    }
    ticks
}

/// A template whose tasks append their declaration index to `log`.
fn task_chain(n: usize, log: &Rc<RefCell<Vec<usize>>>) -> stepper::Template {
    let mut builder = LinearBuilder::new();
    for i in 0..n {
        let log = Rc::clone(log);
        builder = builder.task(move || log.borrow_mut().push(i));
    }
    builder.build().expect("task chain compiles")
}

prop_compose! {
    fn selector_with_expected()(selector in 0..5i32) -> (i32, char) {
        let expected = match selector {
            0 => 'a',
            1 => 'b',
            _ => 'z',
        };
        (selector, expected)
    }
}

proptest! {
    #[test]
    fn task_chains_run_in_order_and_finish_in_n_ticks(n in 1..12usize) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let template = task_chain(n, &log);

        let mut run = template.create_new();
        let ticks = drive(&mut run, n + 1);

        prop_assert_eq!(ticks, n);
        prop_assert_eq!(log.borrow().clone(), (0..n).collect::<Vec<_>>());
        prop_assert_eq!(run.live_vars(), 0);
    }

    #[test]
    fn finished_machines_absorb_extra_updates(n in 1..6usize, extra in 1..10usize) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let template = task_chain(n, &log);

        let mut run = template.create_new();
        drive(&mut run, n + 1);
        let snapshot = log.borrow().clone();

        for _ in 0..extra {
            run.update();
        }
        prop_assert!(run.is_finished());
        prop_assert_eq!(log.borrow().clone(), snapshot);
    }

    #[test]
    fn loops_run_exactly_as_many_iterations_as_the_condition_allows(target in 0..8u32) {
        let laps = Rc::new(Cell::new(0u32));
        let template = LinearBuilder::new()
            .loop_while(
                {
                    let laps = Rc::clone(&laps);
                    move || laps.get() < target
                },
                |body| {
                    body.task({
                        let laps = Rc::clone(&laps);
                        move || laps.set(laps.get() + 1)
                    })
                },
            )
            .build()
            .unwrap();

        let mut run = template.create_new();
        // One entry tick, then one tick per iteration; the last iteration's
        // tick also observes the condition turning false and exits.
        let ticks = drive(&mut run, target as usize + 2);

        prop_assert_eq!(laps.get(), target);
        prop_assert_eq!(ticks, target as usize + 1);
        prop_assert_eq!(run.live_vars(), 0);
    }

    #[test]
    fn clones_ticked_in_lockstep_never_interfere(clones in 1..8usize) {
        let counter = Rc::new(Cell::new(0usize));
        let template = LinearBuilder::new()
            .wait_millis(0)
            .task({
                let counter = Rc::clone(&counter);
                move || counter.set(counter.get() + 1)
            })
            .build()
            .unwrap();

        let mut runs: Vec<_> = (0..clones).map(|_| template.create_new()).collect();
        for _ in 0..3 {
            for run in &mut runs {
                run.update();
            }
        }

        prop_assert!(runs.iter().all(LinearStateMachine::is_finished));
        prop_assert_eq!(counter.get(), clones);
    }

    #[test]
    fn exactly_one_branch_arm_runs((selector, expected) in selector_with_expected()) {
        let log = Rc::new(RefCell::new(String::new()));
        let tag = |c: char| {
            let log = Rc::clone(&log);
            move || log.borrow_mut().push(c)
        };

        let template = LinearBuilder::new()
            .run_if(move || selector == 0, |arm| arm.task(tag('a')))
            .elif(move || selector == 1, |arm| arm.task(tag('b')))
            .else_run(|arm| arm.task(tag('z')))
            .build()
            .unwrap();

        let mut run = template.create_new();
        let ticks = drive(&mut run, 3);

        prop_assert_eq!(ticks, 2);
        prop_assert_eq!(log.borrow().clone(), expected.to_string());
    }

    #[test]
    fn launch_fanout_joins_every_child(children in 0..6usize) {
        let counter = Rc::new(Cell::new(0usize));
        let child = LinearBuilder::new()
            .task({
                let counter = Rc::clone(&counter);
                move || counter.set(counter.get() + 1)
            })
            .build()
            .unwrap();

        let mut builder = LinearBuilder::new();
        for _ in 0..children {
            let (next, _handle) = builder.launch(child.clone());
            builder = next;
        }
        let template = builder.task(|| ()).build().unwrap();

        let mut run = template.create_new();
        // Every launch falls through on the first tick, the trailing task
        // runs, and each one-task child finishes on its first tick too.
        let ticks = drive(&mut run, 2);

        prop_assert_eq!(ticks, 1);
        prop_assert_eq!(counter.get(), children);
        prop_assert_eq!(run.live_vars(), 0);
    }

    #[test]
    fn replaying_a_template_is_deterministic(n in 1..8usize) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let template = task_chain(n, &log);

        let mut first = template.create_new();
        drive(&mut first, n + 1);
        let first_log = log.borrow().clone();

        log.borrow_mut().clear();
        let mut second = template.create_new();
        drive(&mut second, n + 1);

        prop_assert_eq!(log.borrow().clone(), first_log);
    }
}
