//! State trait and the vending machine's closed set of states.
//!
//! All state machine states implement [`State`], which provides pure
//! methods for inspecting state properties without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States are value objects that
/// describe the current position in a state machine and hold nothing
/// beyond their identity.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records
/// - `PartialEq`: states are compared by transition logic
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in status snapshots and events
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Final states accept no further customer requests.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

crate::state_enum! {
    /// The four mutually exclusive modes of a vending machine.
    ///
    /// ```text
    /// Idle --select(in stock)--> ItemSelected --dispense(funds ok)--> Dispensing --> Idle
    ///  |                             |
    ///  +--set_out_of_order-----------+--------> OutOfOrder --repair--> Idle
    /// ```
    #[derive(Copy, Eq, Hash)]
    pub enum MachineState {
        /// Waiting for a customer to choose an item.
        Idle,
        /// An item is chosen; coins are accepted.
        ItemSelected,
        /// A purchase is being fulfilled; every other request waits.
        Dispensing,
        /// Locked out for customers until repaired.
        OutOfOrder,
    }
    final: [OutOfOrder]
    error: [OutOfOrder]
}

impl MachineState {
    /// Whether a customer transaction (a selection) is in flight.
    pub fn in_transaction(&self) -> bool {
        matches!(self, Self::ItemSelected | Self::Dispensing)
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::Idle
    }
}
