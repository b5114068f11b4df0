//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic machine on the label/matcher
//! runtime.
//!
//! Key concepts:
//! - States minted with values and referred to by `StateRef`
//! - One handler per state via `on_run`
//! - Cyclic transitions driven by an external update loop
//!
//! Run with: cargo run --example traffic_light

use stepper::StateMachineBuilder;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut builder = StateMachineBuilder::new();
    let red = builder.create_state("red");
    let green = builder.create_state("green");
    let yellow = builder.create_state("yellow");

    builder.on_run(red, move |_, _| {
        println!("  red    -> green  (go!)");
        green
    });
    builder.on_run(green, move |_, _| {
        println!("  green  -> yellow (caution)");
        yellow
    });
    builder.on_run(yellow, move |_, _| {
        println!("  yellow -> red    (stop)");
        red
    });
    builder.starting_state(red);

    let mut light = builder.build().expect("every state has a handler");

    println!("Starting at: {}\n", light.current_value());
    println!("Three full cycles:");
    for _ in 0..9 {
        light.update();
    }

    println!("\nCurrently showing: {}", light.current_value());
    println!("The cycle repeats for as long as the driver keeps updating.");

    println!("\n=== Example Complete ===");
}
