//! Vending Machine Demo
//!
//! This example replays five scenarios against two independent machines.
//!
//! Key concepts:
//! - Selecting, paying and dispensing (Idle -> ItemSelected -> Dispensing -> Idle)
//! - Rejected requests leave the machine untouched
//! - An out-of-order machine refuses customers until repaired
//! - Dispensing takes time without blocking other machines
//!
//! Run with: cargo run --example vending_demo
//!
//! Narration goes through `tracing`; set `RUST_LOG=vending_fsm=debug` to see
//! every dispatched request. `VENDING_DISPENSE_DELAY_MS` shortens the
//! dispensing pause.

use std::error::Error;
use tracing_subscriber::EnvFilter;
use vending_fsm::core::Money;
use vending_fsm::events::TracingSink;
use vending_fsm::{MachineConfig, SharedMachine};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn show(machine: &SharedMachine) {
    println!("{}\n", machine.status().await);
}

async fn dispense(machine: &SharedMachine) -> Result<(), Box<dyn Error>> {
    let outcome = machine.dispense_item().await?.wait().await?;
    println!("-> {outcome}\n");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = MachineConfig::from_env()?;

    println!("=== Setting up Vending Machine ===\n");
    let machine = SharedMachine::from_config(&config, TracingSink);
    machine.restock("SODA", 10, "1.50".parse::<Money>()?).await?;
    machine.restock("CHIPS", 15, "0.75".parse::<Money>()?).await?;
    machine.restock("CANDY", 20, "1.00".parse::<Money>()?).await?;
    show(&machine).await;

    println!("=== Scenario 1: Successful Purchase ===\n");
    machine.select_item("SODA").await?;
    machine.insert_coin(Money::from_cents(150)).await?;
    show(&machine).await;
    dispense(&machine).await?;
    show(&machine).await;

    println!("=== Scenario 2: Insufficient Funds ===\n");
    machine.select_item("CHIPS").await?;
    machine.insert_coin(Money::from_cents(50)).await?;
    show(&machine).await;
    dispense(&machine).await?;
    machine.insert_coin(Money::from_cents(25)).await?;
    show(&machine).await;
    dispense(&machine).await?;
    show(&machine).await;

    println!("=== Scenario 3: Invalid Operations ===\n");
    dispense(&machine).await?;
    machine.insert_coin(Money::from_cents(100)).await?;

    println!("=== Scenario 4: Machine Out of Order ===\n");
    machine.set_out_of_order().await?;
    show(&machine).await;
    machine.select_item("CANDY").await?;
    machine.insert_coin(Money::from_cents(100)).await?;

    println!("=== Scenario 5: Fresh Machine Ready ===\n");
    let machine2 = SharedMachine::from_config(&config, TracingSink);
    machine2.restock("COFFEE", 8, Money::from_cents(200)).await?;
    machine2.restock("WATER", 25, Money::from_cents(50)).await?;

    machine2.select_item("WATER").await?;
    machine2.insert_coin(Money::from_cents(50)).await?;
    show(&machine2).await;
    dispense(&machine2).await?;

    machine2.select_item("COFFEE").await?;
    machine2.insert_coin(Money::from_cents(100)).await?;
    machine2.insert_coin(Money::from_cents(100)).await?;
    show(&machine2).await;
    dispense(&machine2).await?;

    println!("=== Repairing the first machine ===\n");
    machine.repair().await?;
    show(&machine).await;

    Ok(())
}
