//! Vending FSM: a vending machine modelled as an explicit finite-state machine
//!
//! The machine is built in the "pure core, imperative shell" style. Each of
//! the four states is a plain behavior function over an explicitly passed
//! context; the shell applies the transition it returns, records history and
//! reports the outcome to an injected event sink.
//!
//! # Core Concepts
//!
//! - **States**: `Idle`, `ItemSelected`, `Dispensing` and `OutOfOrder`
//! - **Context**: inventory, prices, balance and the current selection
//! - **Outcomes**: every request is accepted or rejected as a value; only
//!   broken invariants are errors
//! - **Events**: narration goes to an [`EventSink`](events::EventSink)
//!   (`tracing` by default)
//!
//! # Example
//!
//! ```rust
//! use vending_fsm::core::{MachineState, Money};
//! use vending_fsm::machine::{Rejection, VendingMachine};
//!
//! let mut machine = VendingMachine::new();
//! machine.restock("CHIPS", 15, Money::from_cents(75)).unwrap();
//! machine.select_item("CHIPS").unwrap();
//! machine.insert_coin(Money::from_cents(50)).unwrap();
//!
//! let short = machine.dispense_item().unwrap();
//! assert!(matches!(short.rejection(), Some(Rejection::InsufficientFunds { .. })));
//! assert_eq!(machine.state(), MachineState::ItemSelected);
//!
//! machine.insert_coin(Money::from_cents(25)).unwrap();
//! let done = machine.dispense_item().unwrap();
//! assert!(done.receipt().is_some());
//! assert_eq!(machine.status().quantity("CHIPS"), Some(14));
//! ```

pub mod config;
pub mod core;
pub mod events;
pub mod machine;
pub mod shared;
pub mod status;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, MachineConfig};
pub use core::{ItemId, MachineState, Money, State};
pub use machine::{MachineError, Outcome, Rejection, VendingMachine};
pub use shared::{DispenseTicket, SharedMachine};
pub use status::MachineStatus;
