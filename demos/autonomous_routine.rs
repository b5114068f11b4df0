//! Autonomous Routine
//!
//! This example drives a small robot-style routine one tick at a time and
//! exercises the whole linear instruction set.
//!
//! Key concepts:
//! - Tasks and timed waits
//! - A bounded loop of scan passes
//! - A concurrently launched telemetry child, awaited before shutdown
//! - Branching on a condition read when the branch is entered
//! - Runtime traces via `tracing` (the subscriber below prints them)
//!
//! Run with: cargo run --example autonomous_routine

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use stepper::LinearBuilder;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Autonomous Routine ===\n");

    let scans = Rc::new(Cell::new(0u32));
    let battery = Rc::new(Cell::new(74u32));

    let telemetry = LinearBuilder::new()
        .task(|| println!("[telemetry] uplink opened"))
        .wait_millis(40)
        .task(|| println!("[telemetry] burst sent"))
        .build()
        .expect("telemetry compiles");

    let (builder, uplink) = LinearBuilder::new()
        .task(|| println!("[robot] power on"))
        .wait_millis(20)
        .loop_while(
            {
                let scans = Rc::clone(&scans);
                move || scans.get() < 3
            },
            |pass| {
                pass.task({
                    let scans = Rc::clone(&scans);
                    move || {
                        scans.set(scans.get() + 1);
                        println!("[robot] scan pass {}", scans.get());
                    }
                })
                .wait_millis(10)
            },
        )
        .launch(telemetry);

    let template = builder
        .run_if(
            {
                let battery = Rc::clone(&battery);
                move || battery.get() < 30
            },
            |low| low.task(|| println!("[robot] battery low, heading to dock")),
        )
        .else_run(|ok| ok.task(|| println!("[robot] battery healthy, carrying on")))
        .wait_for(uplink)
        .task(|| println!("[robot] shutdown"))
        .build()
        .expect("routine compiles");

    let mut routine = template.create_new();
    while !routine.is_finished() {
        routine.update();
        thread::sleep(Duration::from_millis(5));
    }

    println!("\nAll {} scan passes done, telemetry joined.", scans.get());
    println!("\n=== Example Complete ===");
}
