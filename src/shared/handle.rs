//! Cloneable, lock-protected machine handle.

use super::ticket::DispenseTicket;
use crate::config::MachineConfig;
use crate::core::{ItemId, MachineState, Money, StateHistory};
use crate::events::{EventSink, TracingSink};
use crate::machine::{Accepted, MachineError, Outcome, VendingMachine};
use crate::status::MachineStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tracing::debug;
use uuid::Uuid;

/// A [`VendingMachine`] behind one `tokio` mutex.
///
/// Each operation holds the lock for exactly one transition, so concurrent
/// callers are serialized per machine while separate machines never contend.
/// Dispensing releases the lock during the physical delay; requests arriving
/// meanwhile see the `Dispensing` state and are rejected as busy.
pub struct SharedMachine<K: EventSink = TracingSink> {
    id: Uuid,
    inner: Arc<Mutex<VendingMachine<K>>>,
    dispense_delay: Duration,
}

impl<K: EventSink> Clone for SharedMachine<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dispense_delay: self.dispense_delay,
        }
    }
}

impl<K: EventSink + 'static> SharedMachine<K> {
    pub fn new(machine: VendingMachine<K>, dispense_delay: Duration) -> Self {
        Self {
            id: machine.id(),
            inner: Arc::new(Mutex::new(machine)),
            dispense_delay,
        }
    }

    pub fn from_config(config: &MachineConfig, sink: K) -> Self {
        Self::new(VendingMachine::with_config(config, sink), config.dispense_delay)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dispense_delay(&self) -> Duration {
        self.dispense_delay
    }

    pub async fn restock(
        &self,
        item: impl Into<ItemId>,
        quantity: u32,
        price: Money,
    ) -> Result<Outcome, MachineError> {
        self.inner.lock().await.restock(item, quantity, price)
    }

    pub async fn select_item(&self, item: impl Into<ItemId>) -> Result<Outcome, MachineError> {
        self.inner.lock().await.select_item(item)
    }

    pub async fn insert_coin(&self, amount: Money) -> Result<Outcome, MachineError> {
        self.inner.lock().await.insert_coin(amount)
    }

    /// Start a dispense and schedule its completion.
    ///
    /// The returned ticket resolves to the receipt once the dispense delay
    /// has elapsed (or [`DispenseTicket::finish_now`] is called). A rejected
    /// request yields a ticket that is already finished.
    pub async fn dispense_item(&self) -> Result<DispenseTicket, MachineError> {
        let started = self.inner.lock().await.begin_dispense()?;
        if !matches!(started, Outcome::Accepted(Accepted::DispenseStarted { .. })) {
            return Ok(DispenseTicket::settled(started));
        }

        let inner = Arc::clone(&self.inner);
        let release = Arc::new(Notify::new());
        let wake = Arc::clone(&release);
        let delay = self.dispense_delay;
        let machine = self.id;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wake.notified() => {
                    debug!(%machine, "dispense delay cut short");
                }
            }
            inner.lock().await.complete_dispense()
        });

        Ok(DispenseTicket::scheduled(started, task, release))
    }

    /// See [`VendingMachine::set_out_of_order`].
    pub async fn set_out_of_order(&self) -> Result<Outcome, MachineError> {
        self.inner.lock().await.set_out_of_order()
    }

    pub async fn repair(&self) -> Result<Outcome, MachineError> {
        self.inner.lock().await.repair()
    }

    pub async fn state(&self) -> MachineState {
        self.inner.lock().await.state()
    }

    pub async fn status(&self) -> MachineStatus {
        self.inner.lock().await.status()
    }

    pub async fn history(&self) -> StateHistory<MachineState> {
        self.inner.lock().await.history().clone()
    }
}
