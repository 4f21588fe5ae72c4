//! Machine faults.

use crate::core::MachineState;
use thiserror::Error;

/// Programming-level faults. Customer mistakes are never reported here;
/// they come back as [`Rejection`](crate::machine::Rejection) values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    /// Internal bookkeeping no longer holds, e.g. dispensing with nothing
    /// selected. The machine cannot safely continue.
    #[error("Invariant violated in state {state}: {detail}")]
    InvariantViolated { state: MachineState, detail: String },

    /// The scheduled dispense completion did not run to the end.
    #[error("Dispense completion task failed: {0}")]
    DispenseTask(String),
}

impl MachineError {
    pub(crate) fn invariant(state: MachineState, detail: impl Into<String>) -> Self {
        Self::InvariantViolated {
            state,
            detail: detail.into(),
        }
    }
}
