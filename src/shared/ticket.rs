//! Pending dispense completions.

use crate::machine::{MachineError, Outcome};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Handle to a dispense request made through a
/// [`SharedMachine`](super::SharedMachine).
///
/// When the request was accepted the machine is `Dispensing` and completion
/// runs on a background task after the configured delay; the ticket can be
/// polled with [`is_finished`](Self::is_finished) or awaited with
/// [`wait`](Self::wait). When it was rejected nothing is scheduled and the
/// ticket simply carries the rejection.
#[derive(Debug)]
pub struct DispenseTicket {
    initial: Outcome,
    task: Option<JoinHandle<Result<Outcome, MachineError>>>,
    release: Option<Arc<Notify>>,
}

impl DispenseTicket {
    pub(crate) fn settled(outcome: Outcome) -> Self {
        Self {
            initial: outcome,
            task: None,
            release: None,
        }
    }

    pub(crate) fn scheduled(
        started: Outcome,
        task: JoinHandle<Result<Outcome, MachineError>>,
        release: Arc<Notify>,
    ) -> Self {
        Self {
            initial: started,
            task: Some(task),
            release: Some(release),
        }
    }

    /// What the machine answered when the dispense was requested.
    pub fn initial_outcome(&self) -> &Outcome {
        &self.initial
    }

    /// Whether a completion was scheduled at all.
    pub fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    /// `true` once completion has run, or immediately for a rejected request.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Skip whatever remains of the dispense delay.
    pub fn finish_now(&self) {
        if let Some(release) = &self.release {
            release.notify_one();
        }
    }

    /// Wait for completion and return the final outcome: the receipt, or
    /// the rejection if nothing was scheduled.
    pub async fn wait(self) -> Result<Outcome, MachineError> {
        match self.task {
            None => Ok(self.initial),
            Some(task) => task
                .await
                .map_err(|e| MachineError::DispenseTask(e.to_string()))?,
        }
    }
}
