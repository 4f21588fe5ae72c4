//! Narration of machine activity.
//!
//! Every operation produces a [`MachineEvent`] describing its outcome and
//! the resulting state; every state change produces another. Where the
//! events go is decided by the injected [`EventSink`].

mod sink;

pub use sink::{EventSink, RecordingSink, TracingSink};

use crate::core::{MachineState, Operation};
use crate::machine::Outcome;
use serde::Serialize;
use uuid::Uuid;

/// Something a machine reports to its sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MachineEvent {
    /// A request finished, accepted or rejected.
    Outcome {
        machine: Uuid,
        operation: Operation,
        outcome: Outcome,
        state: MachineState,
    },

    /// The active state changed.
    StateChanged {
        machine: Uuid,
        from: MachineState,
        to: MachineState,
        trigger: Operation,
    },
}

impl MachineEvent {
    pub fn machine(&self) -> Uuid {
        match self {
            Self::Outcome { machine, .. } | Self::StateChanged { machine, .. } => *machine,
        }
    }

    /// The outcome carried by this event, if it reports one.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Outcome { outcome, .. } => Some(outcome),
            Self::StateChanged { .. } => None,
        }
    }
}
