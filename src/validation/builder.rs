//! Builder API for creating restock rules.

use crate::validation::rules::{RestockCheck, RestockRequest, RestockRules};
use crate::validation::violations::RestockViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating restock rules
pub struct RestockRulesBuilder {
    slot_capacity: u32,
    required_checks: Vec<RestockCheck>,
}

impl RestockRulesBuilder {
    pub fn new() -> Self {
        Self {
            slot_capacity: u32::MAX,
            required_checks: Vec::new(),
        }
    }

    /// Set the most units a single slot may hold
    pub fn slot_capacity(mut self, capacity: u32) -> Self {
        self.slot_capacity = capacity;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&RestockRequest<'_>) -> Validation<(), NonEmptyVec<RestockViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&RestockRequest<'_>) -> bool + Send + Sync + 'static,
    {
        let check = move |req: &RestockRequest<'_>| {
            if predicate(req) {
                Validation::success(())
            } else {
                Validation::fail(RestockViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Build the restock rules
    pub fn build(self) -> RestockRules {
        RestockRules {
            slot_capacity: self.slot_capacity,
            required_checks: self.required_checks,
        }
    }
}

impl Default for RestockRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
