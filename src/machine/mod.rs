//! The vending machine: context, per-state behavior and the shell that runs
//! them.
//!
//! Behavior lives in [`transition`] as plain functions over an explicitly
//! passed [`MachineContext`]. [`VendingMachine`] owns one context, forwards
//! each request to the active state's behavior and applies the result.

mod context;
mod error;
mod outcome;
pub mod transition;
mod vending;

pub use context::MachineContext;
pub use error::MachineError;
pub use outcome::{Accepted, Outcome, Receipt, Rejection};
pub use transition::{dispatch, Request, Step};
pub use vending::VendingMachine;
