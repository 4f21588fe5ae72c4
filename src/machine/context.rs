//! Mutable record shared by every state of a machine.

use crate::core::{ItemId, MachineState, Money};
use crate::machine::error::MachineError;
use std::collections::BTreeMap;

/// Inventory, prices, the customer's balance and selection, and the active
/// state.
///
/// One context exists per machine. Transition functions receive it
/// explicitly; nothing about a machine lives anywhere else.
///
/// # Invariants
///
/// - `balance` is never negative.
/// - `selected` is set exactly while the state is `ItemSelected` or
///   `Dispensing`. An outage entered mid-transaction is the one exception:
///   the selection (and balance) are stranded in `OutOfOrder` until repair.
/// - A positive balance implies a selection.
/// - Every stocked item has a price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineContext {
    pub(crate) inventory: BTreeMap<ItemId, u32>,
    pub(crate) prices: BTreeMap<ItemId, Money>,
    pub(crate) balance: Money,
    pub(crate) selected: Option<ItemId>,
    pub(crate) state: MachineState,
}

impl MachineContext {
    /// Empty inventory, zero balance, no selection, `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn selected_item(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn inventory(&self) -> &BTreeMap<ItemId, u32> {
        &self.inventory
    }

    pub fn prices(&self) -> &BTreeMap<ItemId, Money> {
        &self.prices
    }

    /// Units left of `item`, or `None` if it was never stocked.
    pub fn quantity(&self, item: &str) -> Option<u32> {
        self.inventory.get(item).copied()
    }

    pub fn price(&self, item: &str) -> Option<Money> {
        self.prices.get(item).copied()
    }

    /// Verify the bookkeeping invariants listed on the type.
    pub fn check_invariants(&self) -> Result<(), MachineError> {
        let fail = |detail: String| -> Result<(), MachineError> {
            Err(MachineError::invariant(self.state, detail))
        };

        if self.balance.is_negative() {
            return fail(format!("balance {} is negative", self.balance));
        }

        let stranded = self.state == MachineState::OutOfOrder;
        if self.selected.is_some() != self.state.in_transaction() && !stranded {
            return fail(format!(
                "selection {:?} does not match state",
                self.selected.as_ref().map(ItemId::as_str)
            ));
        }

        if self.balance.is_positive() && self.selected.is_none() {
            return fail(format!("balance {} without a selection", self.balance));
        }

        if let Some(unpriced) = self
            .inventory
            .keys()
            .find(|item| !self.prices.contains_key(item.as_str()))
        {
            return fail(format!("item {unpriced} is stocked without a price"));
        }

        if let Some(item) = &self.selected {
            if !self.inventory.contains_key(item.as_str()) {
                return fail(format!("selected item {item} is not stocked"));
            }
        }

        Ok(())
    }
}
