//! The external requests a machine accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names the public operation that triggered an outcome or a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Restock,
    SelectItem,
    InsertCoin,
    DispenseItem,
    SetOutOfOrder,
    Repair,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restock => "restock",
            Self::SelectItem => "select_item",
            Self::InsertCoin => "insert_coin",
            Self::DispenseItem => "dispense_item",
            Self::SetOutOfOrder => "set_out_of_order",
            Self::Repair => "repair",
        }
    }

    /// Phrase used in customer-facing rejection messages.
    pub fn verb_phrase(&self) -> &'static str {
        match self {
            Self::Restock => "restock",
            Self::SelectItem => "select items",
            Self::InsertCoin => "insert coins",
            Self::DispenseItem => "dispense",
            Self::SetOutOfOrder => "set to Out of Order",
            Self::Repair => "repair",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
