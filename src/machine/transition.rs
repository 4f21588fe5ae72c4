//! The behavior table: one function per state, all sharing one call surface.
//!
//! `dispatch` matches the context's current state exhaustively and forwards
//! the request to that state's behavior. Behaviors validate preconditions,
//! mutate the context and name the next state; they never assign it. The
//! machine shell applies the returned [`Step`], records history and narrates.
//!
//! Every behavior either fails with a [`MachineError`] before touching the
//! context, or succeeds with the context fully updated.

use crate::core::{ItemId, MachineState, Money, Operation};
use crate::machine::context::MachineContext;
use crate::machine::error::MachineError;
use crate::machine::outcome::{Accepted, Outcome, Receipt, Rejection};
use crate::validation::{RestockRequest, RestockRules};
use chrono::Utc;
use stillwater::validation::Validation;
use uuid::Uuid;

/// An external request addressed to the active state.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Restock {
        item: ItemId,
        quantity: u32,
        price: Money,
    },
    SelectItem(ItemId),
    InsertCoin(Money),
    DispenseItem,
    SetOutOfOrder,
    Repair,
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Restock { .. } => Operation::Restock,
            Self::SelectItem(_) => Operation::SelectItem,
            Self::InsertCoin(_) => Operation::InsertCoin,
            Self::DispenseItem => Operation::DispenseItem,
            Self::SetOutOfOrder => Operation::SetOutOfOrder,
            Self::Repair => Operation::Repair,
        }
    }
}

/// What a behavior decided: the outcome to report and, when the request
/// changes mode, the state to enter.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub outcome: Outcome,
    pub next: Option<MachineState>,
}

impl Step {
    fn stay(accepted: Accepted) -> Self {
        Self {
            outcome: Outcome::Accepted(accepted),
            next: None,
        }
    }

    fn enter(next: MachineState, accepted: Accepted) -> Self {
        Self {
            outcome: Outcome::Accepted(accepted),
            next: Some(next),
        }
    }

    fn reject(rejection: Rejection) -> Self {
        Self {
            outcome: Outcome::Rejected(rejection),
            next: None,
        }
    }
}

/// Forward `request` to the behavior of the context's current state.
pub fn dispatch(
    ctx: &mut MachineContext,
    request: Request,
    rules: &RestockRules,
) -> Result<Step, MachineError> {
    match ctx.state {
        MachineState::Idle => idle(ctx, request, rules),
        MachineState::ItemSelected => item_selected(ctx, request, rules),
        MachineState::Dispensing => dispensing(ctx, request),
        MachineState::OutOfOrder => out_of_order(ctx, request, rules),
    }
}

fn idle(
    ctx: &mut MachineContext,
    request: Request,
    rules: &RestockRules,
) -> Result<Step, MachineError> {
    match request {
        Request::Restock {
            item,
            quantity,
            price,
        } => Ok(restock(ctx, item, quantity, price, rules)),
        Request::SelectItem(item) => select(ctx, item),
        Request::InsertCoin(_) => Ok(Step::reject(Rejection::NoSelection(
            Operation::InsertCoin,
        ))),
        Request::DispenseItem => Ok(Step::reject(Rejection::NoSelection(
            Operation::DispenseItem,
        ))),
        Request::SetOutOfOrder => Ok(take_out_of_service(ctx)),
        Request::Repair => Ok(Step::reject(Rejection::NotOutOfOrder(MachineState::Idle))),
    }
}

fn item_selected(
    ctx: &mut MachineContext,
    request: Request,
    rules: &RestockRules,
) -> Result<Step, MachineError> {
    match request {
        Request::Restock {
            item,
            quantity,
            price,
        } => Ok(restock(ctx, item, quantity, price, rules)),
        Request::SelectItem(_) => {
            let (selected, _) = selection(ctx)?;
            Ok(Step::reject(Rejection::AlreadySelected(selected)))
        }
        Request::InsertCoin(amount) => {
            if !amount.is_positive() {
                return Ok(Step::reject(Rejection::InvalidCoin(amount)));
            }
            let (item, price) = selection(ctx)?;
            let Some(balance) = ctx.balance.checked_add(amount) else {
                return Ok(Step::reject(Rejection::InvalidCoin(amount)));
            };
            ctx.balance = balance;
            Ok(Step::stay(Accepted::CoinInserted {
                item,
                amount,
                balance,
                remaining: price.shortfall(balance),
            }))
        }
        Request::DispenseItem => {
            // Funds are only compared against the price here, never on insert.
            let (item, price) = selection(ctx)?;
            if ctx.balance >= price {
                Ok(Step::enter(
                    MachineState::Dispensing,
                    Accepted::DispenseStarted { item },
                ))
            } else {
                Ok(Step::reject(Rejection::InsufficientFunds {
                    item,
                    needed: price.shortfall(ctx.balance),
                }))
            }
        }
        Request::SetOutOfOrder => Ok(take_out_of_service(ctx)),
        Request::Repair => Ok(Step::reject(Rejection::NotOutOfOrder(
            MachineState::ItemSelected,
        ))),
    }
}

fn dispensing(ctx: &mut MachineContext, request: Request) -> Result<Step, MachineError> {
    match request {
        Request::DispenseItem => fulfil(ctx),
        Request::Restock { .. }
        | Request::SelectItem(_)
        | Request::InsertCoin(_)
        | Request::SetOutOfOrder
        | Request::Repair => Ok(Step::reject(Rejection::Busy(request.operation()))),
    }
}

fn out_of_order(
    ctx: &mut MachineContext,
    request: Request,
    rules: &RestockRules,
) -> Result<Step, MachineError> {
    match request {
        Request::Restock {
            item,
            quantity,
            price,
        } => Ok(restock(ctx, item, quantity, price, rules)),
        Request::Repair => {
            let forfeited = ctx.balance;
            ctx.balance = Money::zero();
            ctx.selected = None;
            Ok(Step::enter(
                MachineState::Idle,
                Accepted::Repaired { forfeited },
            ))
        }
        Request::SelectItem(_)
        | Request::InsertCoin(_)
        | Request::DispenseItem
        | Request::SetOutOfOrder => Ok(Step::reject(Rejection::OutOfOrder(request.operation()))),
    }
}

fn restock(
    ctx: &mut MachineContext,
    item: ItemId,
    quantity: u32,
    price: Money,
    rules: &RestockRules,
) -> Step {
    let current = ctx.quantity(item.as_str()).unwrap_or(0);
    let request = RestockRequest {
        item: &item,
        quantity,
        price,
        current,
    };

    if let Validation::Failure(errors) = rules.check(&request) {
        return Step::reject(Rejection::InvalidRestock(errors.iter().cloned().collect()));
    }

    let total = current.saturating_add(quantity);
    ctx.inventory.insert(item.clone(), total);
    ctx.prices.insert(item.clone(), price);

    Step::stay(Accepted::Restocked {
        item,
        added: quantity,
        quantity: total,
        price,
    })
}

fn select(ctx: &mut MachineContext, item: ItemId) -> Result<Step, MachineError> {
    match ctx.quantity(item.as_str()) {
        None => Ok(Step::reject(Rejection::UnknownItem(item))),
        Some(0) => Ok(Step::reject(Rejection::OutOfStock(item))),
        Some(_) => {
            let price = ctx.price(item.as_str()).ok_or_else(|| {
                MachineError::invariant(ctx.state, format!("item {item} is stocked without a price"))
            })?;
            ctx.selected = Some(item.clone());
            Ok(Step::enter(
                MachineState::ItemSelected,
                Accepted::ItemSelected {
                    item,
                    price,
                    balance: ctx.balance,
                },
            ))
        }
    }
}

/// Balance and selection are deliberately kept: an outage does not refund.
fn take_out_of_service(ctx: &MachineContext) -> Step {
    Step::enter(
        MachineState::OutOfOrder,
        Accepted::OutOfOrder {
            stranded_balance: ctx.balance,
            stranded_item: ctx.selected.clone(),
        },
    )
}

/// The selected item and its price.
fn selection(ctx: &MachineContext) -> Result<(ItemId, Money), MachineError> {
    let item = ctx
        .selected
        .clone()
        .ok_or_else(|| MachineError::invariant(ctx.state, "no item is selected"))?;
    let price = ctx.price(item.as_str()).ok_or_else(|| {
        MachineError::invariant(ctx.state, format!("selected item {item} has no price"))
    })?;
    Ok((item, price))
}

/// Hand over the selected item: one unit out of stock, change computed,
/// balance and selection reset, back to `Idle`.
fn fulfil(ctx: &mut MachineContext) -> Result<Step, MachineError> {
    let (item, price) = selection(ctx)?;

    let remaining = match ctx.quantity(item.as_str()) {
        Some(stock) if stock > 0 => stock - 1,
        _ => {
            return Err(MachineError::invariant(
                ctx.state,
                format!("item {item} has no stock left to dispense"),
            ))
        }
    };
    let change = match ctx.balance.checked_sub(price) {
        Some(change) if !change.is_negative() => change,
        _ => {
            return Err(MachineError::invariant(
                ctx.state,
                format!("balance {} does not cover price {price}", ctx.balance),
            ))
        }
    };

    let receipt = Receipt {
        transaction_id: Uuid::new_v4(),
        item: item.clone(),
        price,
        paid: ctx.balance,
        change,
        dispensed_at: Utc::now(),
    };

    ctx.inventory.insert(item, remaining);
    ctx.balance = Money::zero();
    ctx.selected = None;

    Ok(Step::enter(MachineState::Idle, Accepted::Dispensed(receipt)))
}
