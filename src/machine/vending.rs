//! The machine shell: applies steps, records history, narrates.

use crate::config::MachineConfig;
use crate::core::{ItemId, MachineState, Money, Operation, StateHistory, StateTransition};
use crate::events::{EventSink, MachineEvent, TracingSink};
use crate::machine::context::MachineContext;
use crate::machine::error::MachineError;
use crate::machine::outcome::{Accepted, Outcome, Rejection};
use crate::machine::transition::{self, Request};
use crate::status::MachineStatus;
use crate::validation::RestockRules;
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

/// A single vending machine.
///
/// Every request is forwarded to the active state's behavior with this
/// machine's context; the machine then applies the resulting transition,
/// records it and reports the outcome to its sink. Calls run to completion
/// one at a time (`&mut self`); see
/// [`SharedMachine`](crate::shared::SharedMachine) for a handle that can be
/// shared between tasks and that dispenses without blocking.
///
/// ```rust
/// use vending_fsm::core::{MachineState, Money};
/// use vending_fsm::events::RecordingSink;
/// use vending_fsm::machine::VendingMachine;
///
/// let mut machine = VendingMachine::with_sink(RecordingSink::new());
/// machine.restock("SODA", 10, Money::from_cents(150)).unwrap();
/// machine.select_item("SODA").unwrap();
/// machine.insert_coin(Money::from_cents(150)).unwrap();
///
/// let outcome = machine.dispense_item().unwrap();
/// assert!(outcome.receipt().is_some());
/// assert_eq!(machine.state(), MachineState::Idle);
/// assert_eq!(machine.status().quantity("SODA"), Some(9));
/// ```
pub struct VendingMachine<K: EventSink = TracingSink> {
    id: Uuid,
    context: MachineContext,
    history: StateHistory<MachineState>,
    restock_rules: RestockRules,
    sink: K,
}

impl VendingMachine<TracingSink> {
    /// A machine with default configuration narrating through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl Default for VendingMachine<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventSink> VendingMachine<K> {
    pub fn with_sink(sink: K) -> Self {
        Self::with_config(&MachineConfig::default(), sink)
    }

    pub fn with_config(config: &MachineConfig, sink: K) -> Self {
        Self {
            id: Uuid::new_v4(),
            context: MachineContext::new(),
            history: StateHistory::with_limit(config.history_limit),
            restock_rules: RestockRules::builder()
                .slot_capacity(config.slot_capacity)
                .build(),
            sink,
        }
    }

    /// Replace the restock rules, e.g. to add custom checks.
    pub fn with_restock_rules(mut self, rules: RestockRules) -> Self {
        self.restock_rules = rules;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> MachineState {
        self.context.state()
    }

    pub fn context(&self) -> &MachineContext {
        &self.context
    }

    pub fn history(&self) -> &StateHistory<MachineState> {
        &self.history
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Read-only snapshot; never mutates.
    pub fn status(&self) -> MachineStatus {
        MachineStatus::capture(self.id, &self.context)
    }

    /// Add `quantity` units of `item` and set its price.
    ///
    /// Allowed in every state except `Dispensing`, including `OutOfOrder`.
    pub fn restock(
        &mut self,
        item: impl Into<ItemId>,
        quantity: u32,
        price: Money,
    ) -> Result<Outcome, MachineError> {
        self.handle(Request::Restock {
            item: item.into(),
            quantity,
            price,
        })
    }

    pub fn select_item(&mut self, item: impl Into<ItemId>) -> Result<Outcome, MachineError> {
        self.handle(Request::SelectItem(item.into()))
    }

    pub fn insert_coin(&mut self, amount: Money) -> Result<Outcome, MachineError> {
        self.handle(Request::InsertCoin(amount))
    }

    /// Complete a purchase in one call.
    ///
    /// From `ItemSelected` with sufficient funds this enters `Dispensing`
    /// and immediately hands the request to that state, which fulfils it and
    /// returns to `Idle`. The returned outcome is the final one (a receipt,
    /// or the rejection).
    pub fn dispense_item(&mut self) -> Result<Outcome, MachineError> {
        let outcome = self.handle(Request::DispenseItem)?;
        if self.context.state == MachineState::Dispensing
            && matches!(outcome, Outcome::Accepted(Accepted::DispenseStarted { .. }))
        {
            return self.handle(Request::DispenseItem);
        }
        Ok(outcome)
    }

    /// Enter `Dispensing` without fulfilling yet.
    ///
    /// While dispensing, every request (including another `begin_dispense`)
    /// is rejected until [`complete_dispense`](Self::complete_dispense) runs.
    pub fn begin_dispense(&mut self) -> Result<Outcome, MachineError> {
        if self.context.state == MachineState::Dispensing {
            let outcome = Outcome::Rejected(Rejection::Busy(Operation::DispenseItem));
            self.report(Operation::DispenseItem, &outcome);
            return Ok(outcome);
        }
        self.handle(Request::DispenseItem)
    }

    /// Fulfil a purchase started with [`begin_dispense`](Self::begin_dispense).
    pub fn complete_dispense(&mut self) -> Result<Outcome, MachineError> {
        if self.context.state != MachineState::Dispensing {
            return Err(MachineError::invariant(
                self.context.state,
                "no dispense in progress",
            ));
        }
        self.handle(Request::DispenseItem)
    }

    /// Take the machine out of service.
    ///
    /// From `ItemSelected` the customer's balance and selection are NOT
    /// reset or refunded; they stay stranded until [`repair`](Self::repair).
    pub fn set_out_of_order(&mut self) -> Result<Outcome, MachineError> {
        self.handle(Request::SetOutOfOrder)
    }

    /// Return an out-of-order machine to `Idle`, discarding any stranded
    /// selection and reporting a stranded balance as forfeited.
    pub fn repair(&mut self) -> Result<Outcome, MachineError> {
        self.handle(Request::Repair)
    }

    fn handle(&mut self, request: Request) -> Result<Outcome, MachineError> {
        let operation = request.operation();
        let from = self.context.state;
        debug!(machine = %self.id, state = %from, %operation, "dispatching request");

        let step = transition::dispatch(&mut self.context, request, &self.restock_rules)
            .inspect_err(|e| error!(machine = %self.id, %operation, "{e}"))?;

        if let Some(to) = step.next {
            self.enter(from, to, operation);
        }

        self.context
            .check_invariants()
            .inspect_err(|e| error!(machine = %self.id, %operation, "{e}"))?;

        self.report(operation, &step.outcome);
        Ok(step.outcome)
    }

    fn enter(&mut self, from: MachineState, to: MachineState, trigger: Operation) {
        self.context.state = to;
        self.history = self.history.record(StateTransition {
            from,
            to,
            trigger,
            timestamp: Utc::now(),
        });
        self.sink.emit(&MachineEvent::StateChanged {
            machine: self.id,
            from,
            to,
            trigger,
        });
    }

    fn report(&self, operation: Operation, outcome: &Outcome) {
        self.sink.emit(&MachineEvent::Outcome {
            machine: self.id,
            operation,
            outcome: outcome.clone(),
            state: self.context.state,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    fn machine() -> VendingMachine<RecordingSink> {
        let mut machine = VendingMachine::with_sink(RecordingSink::new());
        machine.restock("SODA", 10, Money::from_cents(150)).unwrap();
        machine.restock("CHIPS", 15, Money::from_cents(75)).unwrap();
        machine.sink().clear();
        machine
    }

    #[test]
    fn new_machine_is_idle_and_empty() {
        let machine = VendingMachine::with_sink(RecordingSink::new());
        let status = machine.status();

        assert_eq!(status.state, MachineState::Idle);
        assert!(status.balance.is_zero());
        assert!(status.inventory.is_empty());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn dispense_hands_off_through_dispensing() {
        let mut machine = machine();
        machine.select_item("SODA").unwrap();
        machine.insert_coin(Money::from_cents(200)).unwrap();

        let outcome = machine.dispense_item().unwrap();

        assert_eq!(outcome.receipt().map(|r| r.change), Some(Money::from_cents(50)));
        let path: Vec<MachineState> = machine.history().get_path().into_iter().copied().collect();
        assert_eq!(
            path,
            vec![
                MachineState::Idle,
                MachineState::ItemSelected,
                MachineState::Dispensing,
                MachineState::Idle,
            ]
        );
    }

    #[test]
    fn every_request_is_narrated_with_resulting_state() {
        let mut machine = machine();
        machine.insert_coin(Money::from_cents(100)).unwrap();
        machine.select_item("SODA").unwrap();

        let events = machine.sink().events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            MachineEvent::Outcome {
                operation: Operation::InsertCoin,
                outcome: Outcome::Rejected(_),
                state: MachineState::Idle,
                ..
            }
        ));
        assert!(matches!(
            &events[1],
            MachineEvent::StateChanged {
                from: MachineState::Idle,
                to: MachineState::ItemSelected,
                ..
            }
        ));
        assert!(matches!(
            &events[2],
            MachineEvent::Outcome {
                state: MachineState::ItemSelected,
                ..
            }
        ));
        assert!(events.iter().all(|e| e.machine() == machine.id()));
    }

    #[test]
    fn begin_and_complete_dispense_split_the_purchase() {
        let mut machine = machine();
        machine.select_item("CHIPS").unwrap();
        machine.insert_coin(Money::from_cents(75)).unwrap();

        let started = machine.begin_dispense().unwrap();
        assert!(matches!(
            started,
            Outcome::Accepted(Accepted::DispenseStarted { .. })
        ));
        assert_eq!(machine.state(), MachineState::Dispensing);

        let again = machine.begin_dispense().unwrap();
        assert_eq!(
            again.rejection(),
            Some(&Rejection::Busy(Operation::DispenseItem))
        );
        assert_eq!(
            machine.insert_coin(Money::from_cents(25)).unwrap().rejection(),
            Some(&Rejection::Busy(Operation::InsertCoin))
        );

        let done = machine.complete_dispense().unwrap();
        assert!(done.receipt().is_some());
        assert_eq!(machine.state(), MachineState::Idle);
        assert_eq!(machine.status().quantity("CHIPS"), Some(14));
    }

    #[test]
    fn complete_without_begin_is_a_fault() {
        let mut machine = machine();
        assert!(matches!(
            machine.complete_dispense(),
            Err(MachineError::InvariantViolated { .. })
        ));
        assert_eq!(machine.state(), MachineState::Idle);
    }

    #[test]
    fn dispense_item_in_dispensing_completes() {
        let mut machine = machine();
        machine.select_item("SODA").unwrap();
        machine.insert_coin(Money::from_cents(150)).unwrap();
        machine.begin_dispense().unwrap();

        let outcome = machine.dispense_item().unwrap();
        assert!(outcome.receipt().is_some());
        assert_eq!(machine.state(), MachineState::Idle);
    }

    #[test]
    fn out_of_order_strands_then_repair_forfeits() {
        let mut machine = machine();
        machine.select_item("SODA").unwrap();
        machine.insert_coin(Money::from_cents(100)).unwrap();

        machine.set_out_of_order().unwrap();
        let status = machine.status();
        assert_eq!(status.state, MachineState::OutOfOrder);
        assert_eq!(status.balance, Money::from_cents(100));
        assert_eq!(status.selected_item, Some(ItemId::from("SODA")));

        let repaired = machine.repair().unwrap();
        assert_eq!(
            repaired,
            Outcome::Accepted(Accepted::Repaired {
                forfeited: Money::from_cents(100)
            })
        );
        assert_eq!(machine.state(), MachineState::Idle);
        assert!(machine.status().selected_item.is_none());
    }

    #[test]
    fn repair_outside_outage_is_rejected() {
        let mut machine = machine();
        let outcome = machine.repair().unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::NotOutOfOrder(MachineState::Idle))
        );
    }

    #[test]
    fn restock_respects_configured_capacity() {
        let config = MachineConfig::default().with_slot_capacity(12);
        let mut machine = VendingMachine::with_config(&config, RecordingSink::new());

        assert!(machine.restock("SODA", 10, Money::from_cents(150)).unwrap().is_accepted());
        let overfill = machine.restock("SODA", 3, Money::from_cents(150)).unwrap();
        assert!(matches!(
            overfill.rejection(),
            Some(Rejection::InvalidRestock(_))
        ));
        assert_eq!(machine.status().quantity("SODA"), Some(10));
    }

    #[test]
    fn history_limit_comes_from_config() {
        let config = MachineConfig::default().with_history_limit(2);
        let mut machine = VendingMachine::with_config(&config, RecordingSink::new());
        machine.restock("SODA", 10, Money::from_cents(150)).unwrap();
        machine.select_item("SODA").unwrap();
        machine.insert_coin(Money::from_cents(150)).unwrap();
        machine.dispense_item().unwrap();

        assert_eq!(machine.history().len(), 2);
        assert_eq!(machine.history().limit(), 2);
    }

    #[test]
    fn custom_restock_rules_apply() {
        let rules = RestockRules::builder()
            .require_pred(
                |req| req.price.cents() % 5 == 0,
                "prices must be payable in nickels".to_string(),
            )
            .build();
        let mut machine =
            VendingMachine::with_sink(RecordingSink::new()).with_restock_rules(rules);

        assert!(machine.restock("GUM", 5, Money::from_cents(33)).unwrap().is_rejected());
        assert!(machine.restock("GUM", 5, Money::from_cents(35)).unwrap().is_accepted());
    }
}
