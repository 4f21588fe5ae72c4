//! Core value types of the vending machine.
//!
//! This module contains the pure building blocks the machine is made of:
//! - the closed set of states via the `State` trait and `MachineState`
//! - integer `Money` and `ItemId`
//! - the `Operation` names used for narration and history
//! - immutable, bounded history tracking
//!
//! Nothing in this module performs I/O or logging.

mod history;
mod item;
mod macros;
mod money;
mod operation;
mod state;

pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use item::ItemId;
pub use money::{Money, MoneyParseError};
pub use operation::Operation;
pub use state::{MachineState, State};
