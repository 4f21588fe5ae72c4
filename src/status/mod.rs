//! Read-only status snapshots.
//!
//! A snapshot copies everything an operator display needs out of a machine:
//! its state, the customer's balance and selection, stock and prices. Taking
//! one never changes the machine.

use crate::core::{ItemId, MachineState, Money};
use crate::machine::MachineContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub mod error;

pub use error::StatusError;

/// Point-in-time view of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub machine_id: Uuid,
    pub state: MachineState,
    pub balance: Money,
    pub selected_item: Option<ItemId>,
    pub inventory: BTreeMap<ItemId, u32>,
    pub prices: BTreeMap<ItemId, Money>,
    pub taken_at: DateTime<Utc>,
}

impl MachineStatus {
    /// Copy the observable parts of `context`.
    pub fn capture(machine_id: Uuid, context: &MachineContext) -> Self {
        Self {
            machine_id,
            state: context.state(),
            balance: context.balance(),
            selected_item: context.selected_item().cloned(),
            inventory: context.inventory().clone(),
            prices: context.prices().clone(),
            taken_at: Utc::now(),
        }
    }

    pub fn quantity(&self, item: &str) -> Option<u32> {
        self.inventory.get(item).copied()
    }

    pub fn price(&self, item: &str) -> Option<Money> {
        self.prices.get(item).copied()
    }

    pub fn to_json(&self) -> Result<String, StatusError> {
        serde_json::to_string_pretty(self).map_err(|e| StatusError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, StatusError> {
        serde_json::from_str(json).map_err(|e| StatusError::DeserializationFailed(e.to_string()))
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Vending Machine Status ===")?;
        writeln!(f, "Current State: {}", self.state)?;
        writeln!(f, "Current Balance: {}", self.balance)?;
        match &self.selected_item {
            Some(item) => writeln!(f, "Selected Item: {item}")?,
            None => writeln!(f, "Selected Item: None")?,
        }
        let inventory = self
            .inventory
            .iter()
            .map(|(item, quantity)| format!("{item}={quantity}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "Inventory: {{{inventory}}}")?;
        write!(f, "==============================")
    }
}
