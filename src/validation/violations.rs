//! Restock violations.

use crate::core::Money;
use serde::Serialize;
use thiserror::Error;

/// Something wrong with a restock request.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockViolation {
    #[error("item id is blank")]
    BlankItemId,

    #[error("item id '{0}' has leading or trailing whitespace")]
    PaddedItemId(String),

    #[error("price {0} is negative")]
    NegativePrice(Money),

    #[error("slot {item} would hold {requested} items (capacity {capacity})")]
    CapacityExceeded {
        item: String,
        requested: u64,
        capacity: u32,
    },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
