//! Values returned by every machine operation.
//!
//! Expected rejections (wrong state, unknown item, bad coin, short funds)
//! are ordinary values here, never errors: the call returns normally and the
//! machine is left exactly as it was.

use crate::core::{ItemId, MachineState, Money, Operation};
use crate::validation::RestockViolation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Result of a single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted(Accepted),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Accepted(_) => None,
        }
    }

    /// The receipt of a completed purchase.
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Accepted(Accepted::Dispensed(receipt)) => Some(receipt),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(accepted) => fmt::Display::fmt(accepted, f),
            Self::Rejected(rejection) => fmt::Display::fmt(rejection, f),
        }
    }
}

/// A request the machine carried out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accepted {
    /// Stock was added and the price overwritten.
    Restocked {
        item: ItemId,
        added: u32,
        quantity: u32,
        price: Money,
    },

    ItemSelected {
        item: ItemId,
        price: Money,
        balance: Money,
    },

    /// `remaining` is zero once the balance covers the price.
    CoinInserted {
        item: ItemId,
        amount: Money,
        balance: Money,
        remaining: Money,
    },

    /// Funds were sufficient and fulfilment has begun.
    DispenseStarted { item: ItemId },

    Dispensed(Receipt),

    /// Balance and selection are left in place, not refunded.
    OutOfOrder {
        stranded_balance: Money,
        stranded_item: Option<ItemId>,
    },

    /// Back in service; `forfeited` is any balance stranded by the outage.
    Repaired { forfeited: Money },
}

impl fmt::Display for Accepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restocked {
                item,
                added,
                quantity,
                price,
            } => write!(
                f,
                "Added {added} of item {item} at {price} ({quantity} in stock)"
            ),
            Self::ItemSelected {
                item,
                price,
                balance,
            } => write!(
                f,
                "Item {item} selected. Price: {price}. Current balance: {balance}"
            ),
            Self::CoinInserted {
                item,
                amount,
                balance,
                remaining,
            } => {
                write!(f, "Coin of {amount} inserted. Current balance: {balance}. ")?;
                if remaining.is_zero() {
                    write!(f, "Sufficient funds. Ready to dispense {item}")
                } else {
                    write!(f, "Need {remaining} more to dispense {item}")
                }
            }
            Self::DispenseStarted { item } => write!(f, "Dispensing {item}..."),
            Self::Dispensed(receipt) => fmt::Display::fmt(receipt, f),
            Self::OutOfOrder {
                stranded_balance, ..
            } => {
                write!(f, "Machine set to Out of Order")?;
                if stranded_balance.is_positive() {
                    write!(f, " with {stranded_balance} still inserted")?;
                }
                Ok(())
            }
            Self::Repaired { forfeited } => {
                write!(f, "Machine repaired and returned to service")?;
                if forfeited.is_positive() {
                    write!(f, "; {forfeited} forfeited")?;
                }
                Ok(())
            }
        }
    }
}

/// Proof of a completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: Uuid,
    pub item: ItemId,
    pub price: Money,
    pub paid: Money,
    pub change: Money,
    pub dispensed_at: DateTime<Utc>,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dispensed successfully!", self.item)?;
        if self.change.is_positive() {
            write!(f, " Change: {}", self.change)?;
        }
        Ok(())
    }
}

/// Why a request was refused. The machine is unchanged.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("Item {0} does not exist")]
    UnknownItem(ItemId),

    #[error("Item {0} is out of stock")]
    OutOfStock(ItemId),

    #[error("Cannot {} in Idle state. Please select an item first", .0.verb_phrase())]
    NoSelection(Operation),

    #[error("Cannot select another item. Item {0} is already selected")]
    AlreadySelected(ItemId),

    #[error("Invalid coin amount {0}. Please insert a valid amount")]
    InvalidCoin(Money),

    #[error("Insufficient funds. Need {needed} more to dispense {item}")]
    InsufficientFunds { item: ItemId, needed: Money },

    #[error("Cannot {} while dispensing. Please wait", .0.verb_phrase())]
    Busy(Operation),

    #[error("Machine is out of order. Cannot {}", .0.verb_phrase())]
    OutOfOrder(Operation),

    #[error("Machine is not out of order (state: {0})")]
    NotOutOfOrder(MachineState),

    #[error("Restock rejected: {}", join_violations(.0))]
    InvalidRestock(Vec<RestockViolation>),
}

fn join_violations(violations: &[RestockViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(change: i64) -> Receipt {
        Receipt {
            transaction_id: Uuid::new_v4(),
            item: ItemId::from("SODA"),
            price: Money::from_cents(150),
            paid: Money::from_cents(150 + change),
            change: Money::from_cents(change),
            dispensed_at: Utc::now(),
        }
    }

    #[test]
    fn exact_payment_has_no_change_message() {
        assert_eq!(receipt(0).to_string(), "SODA dispensed successfully!");
    }

    #[test]
    fn overpayment_reports_change() {
        assert_eq!(
            receipt(50).to_string(),
            "SODA dispensed successfully! Change: $0.50"
        );
    }

    #[test]
    fn coin_message_reports_remaining_or_sufficiency() {
        let short = Accepted::CoinInserted {
            item: ItemId::from("CHIPS"),
            amount: Money::from_cents(50),
            balance: Money::from_cents(50),
            remaining: Money::from_cents(25),
        };
        assert!(short.to_string().ends_with("Need $0.25 more to dispense CHIPS"));

        let enough = Accepted::CoinInserted {
            item: ItemId::from("CHIPS"),
            amount: Money::from_cents(25),
            balance: Money::from_cents(75),
            remaining: Money::zero(),
        };
        assert!(enough.to_string().contains("Sufficient funds"));
    }

    #[test]
    fn rejection_messages_name_the_operation() {
        assert_eq!(
            Rejection::NoSelection(Operation::InsertCoin).to_string(),
            "Cannot insert coins in Idle state. Please select an item first"
        );
        assert_eq!(
            Rejection::Busy(Operation::SelectItem).to_string(),
            "Cannot select items while dispensing. Please wait"
        );
        assert_eq!(
            Rejection::UnknownItem(ItemId::from("GUM")).to_string(),
            "Item GUM does not exist"
        );
    }

    #[test]
    fn restock_rejection_lists_every_violation() {
        let rejection = Rejection::InvalidRestock(vec![
            RestockViolation::BlankItemId,
            RestockViolation::NegativePrice(Money::from_cents(-5)),
        ]);
        assert_eq!(
            rejection.to_string(),
            "Restock rejected: item id is blank; price -$0.05 is negative"
        );
    }

    #[test]
    fn outcome_accessors() {
        let outcome = Outcome::Accepted(Accepted::Dispensed(receipt(0)));
        assert!(outcome.is_accepted());
        assert!(outcome.receipt().is_some());
        assert!(outcome.rejection().is_none());

        let rejected = Outcome::Rejected(Rejection::InvalidCoin(Money::zero()));
        assert!(rejected.is_rejected());
        assert!(rejected.receipt().is_none());
    }
}
