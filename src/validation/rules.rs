//! Restock rules using Validation.

use crate::core::{ItemId, Money};
use crate::validation::builder::RestockRulesBuilder;
use crate::validation::violations::RestockViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// A restock request as seen by the rules.
#[derive(Debug, Clone, Copy)]
pub struct RestockRequest<'a> {
    pub item: &'a ItemId,
    pub quantity: u32,
    pub price: Money,
    /// Units already in the slot.
    pub current: u32,
}

impl RestockRequest<'_> {
    /// Units the slot would hold after the restock, without overflow.
    pub fn resulting_quantity(&self) -> u64 {
        u64::from(self.current) + u64::from(self.quantity)
    }
}

/// Type alias for custom restock checks
pub type RestockCheck =
    Box<dyn Fn(&RestockRequest<'_>) -> Validation<(), NonEmptyVec<RestockViolation>> + Send + Sync>;

/// Rules every restock must satisfy.
pub struct RestockRules {
    pub(crate) slot_capacity: u32,
    pub(crate) required_checks: Vec<RestockCheck>,
}

impl Default for RestockRules {
    fn default() -> Self {
        RestockRulesBuilder::new().build()
    }
}

impl std::fmt::Debug for RestockRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestockRules")
            .field("slot_capacity", &self.slot_capacity)
            .field("required_checks", &self.required_checks.len())
            .finish()
    }
}

impl RestockRules {
    pub fn builder() -> RestockRulesBuilder {
        RestockRulesBuilder::new()
    }

    pub fn slot_capacity(&self) -> u32 {
        self.slot_capacity
    }

    /// Check every rule, accumulating ALL violations.
    pub fn check(&self, request: &RestockRequest<'_>) -> Validation<(), NonEmptyVec<RestockViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<RestockViolation>>> = Vec::new();

        let id = request.item.as_str();
        checks.push(if id.trim().is_empty() {
            Validation::fail(RestockViolation::BlankItemId)
        } else if id.trim() != id {
            Validation::fail(RestockViolation::PaddedItemId(id.to_string()))
        } else {
            Validation::success(())
        });

        checks.push(if request.price.is_negative() {
            Validation::fail(RestockViolation::NegativePrice(request.price))
        } else {
            Validation::success(())
        });

        let requested = request.resulting_quantity();
        checks.push(if requested > u64::from(self.slot_capacity) {
            Validation::fail(RestockViolation::CapacityExceeded {
                item: id.to_string(),
                requested,
                capacity: self.slot_capacity,
            })
        } else {
            Validation::success(())
        });

        for check_fn in &self.required_checks {
            checks.push(check_fn(request));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every violation of `request`, empty when it is acceptable.
    pub fn violations(&self, request: &RestockRequest<'_>) -> Vec<RestockViolation> {
        match self.check(request) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}
