//! State transition history tracking.
//!
//! Provides an immutable, bounded audit trail of every state change a
//! machine goes through.

use super::operation::Operation;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions a history keeps before dropping the oldest.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use vending_fsm::core::{MachineState, Operation, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: MachineState::Idle,
///     to: MachineState::ItemSelected,
///     trigger: Operation::SelectItem,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.trigger, Operation::SelectItem);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The operation that caused the transition
    pub trigger: Operation,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition added. Once `limit` transitions are held, recording drops the
/// oldest one so a long-running machine does not grow without bound.
///
/// # Example
///
/// ```rust
/// use vending_fsm::core::{MachineState, Operation, StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: MachineState::Idle,
///         to: MachineState::ItemSelected,
///         trigger: Operation::SelectItem,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: MachineState::ItemSelected,
///         to: MachineState::Dispensing,
///         trigger: Operation::DispenseItem,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Idle -> ItemSelected -> Dispensing
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history holding up to [`DEFAULT_HISTORY_LIMIT`]
    /// transitions.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a new empty history holding up to `limit` transitions
    /// (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        if transitions.len() == self.limit {
            transitions.pop_front();
        }
        transitions.push_back(transition);
        Self {
            transitions,
            limit: self.limit,
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition, then the
    /// `to` state of each transition in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the oldest and newest retained transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Iterate over retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> + '_ {
        self.transitions.iter()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MachineState;

    fn step(from: MachineState, to: MachineState, trigger: Operation) -> StateTransition<MachineState> {
        StateTransition {
            from,
            to,
            trigger,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<MachineState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(step(
            MachineState::Idle,
            MachineState::ItemSelected,
            Operation::SelectItem,
        ));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_follows_a_purchase() {
        let history = StateHistory::new()
            .record(step(
                MachineState::Idle,
                MachineState::ItemSelected,
                Operation::SelectItem,
            ))
            .record(step(
                MachineState::ItemSelected,
                MachineState::Dispensing,
                Operation::DispenseItem,
            ))
            .record(step(
                MachineState::Dispensing,
                MachineState::Idle,
                Operation::DispenseItem,
            ));

        let path = history.get_path();
        assert_eq!(
            path,
            vec![
                &MachineState::Idle,
                &MachineState::ItemSelected,
                &MachineState::Dispensing,
                &MachineState::Idle,
            ]
        );
        assert_eq!(history.last().map(|t| t.to), Some(MachineState::Idle));
    }

    #[test]
    fn limit_drops_oldest_transition() {
        let history = StateHistory::with_limit(2)
            .record(step(
                MachineState::Idle,
                MachineState::ItemSelected,
                Operation::SelectItem,
            ))
            .record(step(
                MachineState::ItemSelected,
                MachineState::OutOfOrder,
                Operation::SetOutOfOrder,
            ))
            .record(step(
                MachineState::OutOfOrder,
                MachineState::Idle,
                Operation::Repair,
            ));

        assert_eq!(history.len(), 2);
        let triggers: Vec<_> = history.transitions().map(|t| t.trigger).collect();
        assert_eq!(triggers, vec![Operation::SetOutOfOrder, Operation::Repair]);
        assert_eq!(history.get_path()[0], &MachineState::ItemSelected);
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let history = StateHistory::with_limit(0).record(step(
            MachineState::Idle,
            MachineState::OutOfOrder,
            Operation::SetOutOfOrder,
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(step(
            MachineState::Idle,
            MachineState::OutOfOrder,
            Operation::SetOutOfOrder,
        ));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(step(
            MachineState::Idle,
            MachineState::ItemSelected,
            Operation::SelectItem,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<MachineState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(
            deserialized.last().map(|t| t.trigger),
            Some(Operation::SelectItem)
        );
    }
}
