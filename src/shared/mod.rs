//! Asynchronous access to a machine.
//!
//! [`SharedMachine`] wraps a [`VendingMachine`](crate::machine::VendingMachine)
//! so it can be driven from several `tokio` tasks, and models the physical
//! dispensing delay without blocking: the machine sits in `Dispensing` while
//! a background task waits out the delay and then completes the purchase.

mod handle;
mod ticket;

pub use handle::SharedMachine;
pub use ticket::DispenseTicket;
