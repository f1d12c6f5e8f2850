//! Validation for production plans.
//!
//! Everything in this module is a pure query: it inspects a plan (or a part
//! of one) and reports a [`ValidationResult`]. Nothing here mutates a plan
//! and nothing here returns an error; a failed check is an ordinary value
//! carrying the human-readable messages to show the user.
//!
//! | module         | checks                                                   |
//! |----------------|----------------------------------------------------------|
//! | [`fields`]     | one concern each (dates, quantities, fabric completeness) |
//! | [`step`]       | which field checks gate each wizard step                 |
//! | [`allocation`] | pre-commit guards for quantity edits                     |

pub mod allocation;
pub mod common;
pub mod fields;
pub mod step;

use serde::{Deserialize, Serialize};

pub use allocation::{
    AllocationSummary, FabricRequirement, QUANTITY_TOO_LARGE, allocation_summary, check_add_color,
    check_color_quantity, check_fabric_quantity, check_total_order_quantity,
};
pub use common::{parse_quantity, sum_quantities};
pub use fields::{
    color_advisories, validate_basic_info, validate_fabric_details, validate_fabric_selection,
    validate_fabrics_quantity, validate_fabrics_quantity_with, validate_international_fabrics,
};
pub use step::validate_step;

/// How the fabric quantities of a plan must relate to its total order
/// quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityPolicy {
    /// The fabric quantities may not exceed the order total.
    AtMost,
    /// The fabric quantities must add up to exactly the order total.
    Exact,
}

/// The policy applied by [`validate_fabrics_quantity`] and the step
/// validator.
pub const QUANTITY_POLICY: QuantityPolicy = QuantityPolicy::AtMost;

/// Outcome of a validation: whether it passed, and every message explaining
/// why not, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::from_errors(vec![message.into()])
    }

    /// Append the messages of `other` after this result's own.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.is_valid = self.is_valid && other.is_valid && self.errors.is_empty();
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_errors_is_valid_only_when_empty() {
        assert!(ValidationResult::from_errors(vec![]).is_valid);
        assert!(!ValidationResult::from_errors(vec!["x".to_string()]).is_valid);
    }

    #[test]
    fn merge_keeps_message_order() {
        let merged = ValidationResult::invalid("first").merge(ValidationResult::invalid("second"));

        assert!(!merged.is_valid);
        assert_eq!(merged.errors, vec!["first", "second"]);
    }

    #[test]
    fn merge_of_valid_results_is_valid() {
        let merged = ValidationResult::valid().merge(ValidationResult::valid());

        assert_eq!(merged, ValidationResult::valid());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ValidationResult::invalid("nope")).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0], "nope");
    }
}
