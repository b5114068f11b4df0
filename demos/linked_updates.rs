//! Linked Updates
//!
//! This example advances two independent machines in lockstep through a
//! single `LinkedStateMachine`.
//!
//! Key concepts:
//! - Composing built machines with `new`, `push`, and `merge`
//! - One driver tick updates every member, in composition order
//!
//! Run with: cargo run --example linked_updates

use stepper::{LinkedStateMachine, StateMachine, StateMachineBuilder};

fn pulse(tag: &'static str) -> StateMachine<&'static str> {
    let mut builder = StateMachineBuilder::new();
    let high = builder.create_state("high");
    let low = builder.create_state("low");
    builder.on_run(high, move |_, _| {
        println!("  {tag}: high -> low");
        low
    });
    builder.on_run(low, move |_, _| {
        println!("  {tag}: low -> high");
        high
    });
    builder.starting_state(high);
    builder.build().expect("pulse machine compiles")
}

fn main() {
    println!("=== Linked Updates ===\n");

    let mut linked = LinkedStateMachine::new(vec![pulse("heartbeat")])
        .push(pulse("blinker"))
        .merge(LinkedStateMachine::new(vec![pulse("beacon")]));

    println!("Driving {} machines in lockstep:\n", linked.len());
    for tick in 1..=4 {
        println!("tick {tick}:");
        linked.update();
    }

    println!("\nNo member ever gets ahead: each driver tick updates all of them once.");
    println!("\n=== Example Complete ===");
}
