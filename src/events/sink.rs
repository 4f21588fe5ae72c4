//! Event sinks.

use super::MachineEvent;
use crate::machine::Outcome;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Receives narration from a machine.
///
/// Sinks are collaborators, not core logic: a machine behaves identically
/// whichever sink it is given.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &MachineEvent);
}

impl<K: EventSink + ?Sized> EventSink for Arc<K> {
    fn emit(&self, event: &MachineEvent) {
        (**self).emit(event);
    }
}

/// Narrates through `tracing`: accepted outcomes and state changes at INFO,
/// rejections at WARN.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &MachineEvent) {
        match event {
            MachineEvent::Outcome {
                machine,
                operation,
                outcome: Outcome::Accepted(accepted),
                state,
            } => {
                info!(%machine, %operation, %state, "{accepted}");
            }
            MachineEvent::Outcome {
                machine,
                operation,
                outcome: Outcome::Rejected(rejection),
                state,
            } => {
                warn!(%machine, %operation, %state, "{rejection}");
            }
            MachineEvent::StateChanged {
                machine,
                from,
                to,
                trigger,
            } => {
                info!(%machine, %from, %trigger, "State changed to: {to}");
            }
        }
    }
}

/// Keeps every event in memory, in order.
///
/// Clones share the same buffer, so a test can hand one clone to a machine
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<MachineEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event recorded so far.
    pub fn events(&self) -> Vec<MachineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the outcomes, in order.
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MachineEvent::Outcome { outcome, .. } => Some(outcome),
                MachineEvent::StateChanged { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MachineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MachineState, Money, Operation};
    use crate::machine::Rejection;
    use uuid::Uuid;

    fn rejected() -> MachineEvent {
        MachineEvent::Outcome {
            machine: Uuid::new_v4(),
            operation: Operation::InsertCoin,
            outcome: Outcome::Rejected(Rejection::InvalidCoin(Money::zero())),
            state: MachineState::ItemSelected,
        }
    }

    #[test]
    fn recording_sink_shares_buffer_between_clones() {
        let sink = RecordingSink::new();
        let handle = sink.clone();

        sink.emit(&rejected());
        sink.emit(&MachineEvent::StateChanged {
            machine: Uuid::new_v4(),
            from: MachineState::Idle,
            to: MachineState::OutOfOrder,
            trigger: Operation::SetOutOfOrder,
        });

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.outcomes().len(), 1);

        handle.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn arc_sink_forwards() {
        let sink = Arc::new(RecordingSink::new());
        let shared: Arc<RecordingSink> = Arc::clone(&sink);
        shared.emit(&rejected());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn tracing_sink_accepts_every_event_kind() {
        let sink = TracingSink;
        sink.emit(&rejected());
        sink.emit(&MachineEvent::StateChanged {
            machine: Uuid::new_v4(),
            from: MachineState::Idle,
            to: MachineState::ItemSelected,
            trigger: Operation::SelectItem,
        });
    }

    #[test]
    fn events_serialize_with_a_tag() {
        let json = serde_json::to_value(rejected()).unwrap();
        assert_eq!(json["event"], "outcome");
        assert_eq!(json["operation"], "insert_coin");
        assert_eq!(json["state"], "ItemSelected");
    }
}
