//! Door Controller
//!
//! This example drives several independent doors from one shared machine
//! definition.
//!
//! Key concepts:
//! - One `StateManager`, one instance per door key
//! - Enter/leave listeners scoped to a single door
//! - Observers reacting to "open" states
//! - Bulk queries and `enter_all` for a building-wide lockdown
//! - Checkpointing every door's state
//!
//! Run with: RUST_LOG=debug cargo run --example door_controller

use keyed_fsm::observer::StateObserver;
use keyed_fsm::{InstanceKey, MachineId, State, StateManager};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Door Controller Example ===\n");

    let machine = MachineId::new("door");
    let closed = machine.state("Closed");
    let open = machine.state("Open");
    let locked = machine.state("Locked");

    let manager = Arc::new(
        StateManager::builder(machine)
            .initial(closed.clone())
            .states([open.clone(), locked.clone()])
            .debug_log(true)
            .record_history(true)
            .build()?,
    );

    let front = Some(InstanceKey::new());
    let back = Some(InstanceKey::new());

    manager.add_leave_listener(
        Arc::new(|s: Option<&State>| {
            println!("  [front] leaving {}", s.map_or("nothing", |s| s.name()));
        }),
        front,
    );
    manager.add_enter_listener(
        Arc::new(|s: &State| println!("  [front] entered {}", s)),
        front,
    );

    let _front_light = StateObserver::builder(vec![open.clone()])
        .key(front)
        .name("front-light")
        .on_activated(|| println!("  [front-light] on"))
        .on_deactivated(|at_start| {
            if !at_start {
                println!("  [front-light] off")
            }
        })
        .attach(&manager);
    manager.init(back);

    println!("Opening the front door");
    manager.enter(&open, front);
    println!("Back door is {:?}", manager.current_state(back));

    println!(
        "\nAny door not locked? {}",
        manager.any_instance_not_in_either_state(&[locked.clone()])
    );

    println!("\nLockdown");
    let changed = manager.enter_all(&locked);
    println!("  {} instances locked", changed);
    println!(
        "All doors locked? {}",
        manager.all_instances_in_either_state(&[locked.clone()])
    );

    let checkpoint = manager.checkpoint();
    println!("\nCheckpoint:\n{}", checkpoint.to_json()?);

    if let Some(history) = manager.history() {
        println!("\nFront door path: {:?}", history.get_path(front));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
