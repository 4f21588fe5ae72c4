//! Validation of restock requests.
//!
//! Restocking is the only way inventory and prices enter a machine, so it is
//! checked with Stillwater's `Validation` type, which accumulates ALL
//! violations instead of stopping at the first one. An operator feeding a
//! bad request sees everything wrong with it in one pass.
//!
//! # Example
//!
//! ```rust
//! use vending_fsm::core::{ItemId, Money};
//! use vending_fsm::validation::{RestockRequest, RestockRules};
//!
//! let rules = RestockRules::builder()
//!     .slot_capacity(20)
//!     .require_pred(
//!         |req| req.price.cents() % 5 == 0,
//!         "prices must be multiples of $0.05".to_string(),
//!     )
//!     .build();
//!
//! let item = ItemId::from("SODA");
//! let request = RestockRequest {
//!     item: &item,
//!     quantity: 30,
//!     price: Money::from_cents(152),
//!     current: 0,
//! };
//!
//! let violations = rules.violations(&request);
//! assert_eq!(violations.len(), 2);
//! ```

pub mod builder;
pub mod rules;
pub mod violations;

pub use builder::RestockRulesBuilder;
pub use rules::{RestockRequest, RestockRules};
pub use violations::RestockViolation;
