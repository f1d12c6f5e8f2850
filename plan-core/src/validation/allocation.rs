//! Allocation guards.
//!
//! Fabric quantities are an allocation of the order total and color
//! quantities are an allocation of their fabric's quantity; neither may
//! exceed its parent. These checks run *before* an edit is applied so the
//! draft never holds an over-allocated state. [`crate::draft::PlanDraft`]
//! consults them for every quantity-bearing edit.

use rust_decimal::Decimal;
use serde::Serialize;

use super::ValidationResult;
use super::common::{is_blank, parse_quantity, round_half_up, sum_quantities};
use crate::models::{FabricDetails, ProductionPlan, Unit};

/// Shown when quantities add up past what a decimal can hold.
pub const QUANTITY_TOO_LARGE: &str = "Quantities are too large to add up";

fn colors_allocated(fabric: &FabricDetails) -> Option<Decimal> {
    sum_quantities(fabric.colors.iter().map(|c| c.quantity.as_str()))
}

fn positive(value: &str) -> Option<Decimal> {
    parse_quantity(value).filter(|v| *v > Decimal::ZERO)
}

/// May fabric `index` have its quantity set to `proposed`?
///
/// Rejects values that are not positive numbers, values that would push the
/// fabrics past the order total, and values below what the fabric has
/// already handed out to its colors.
pub fn check_fabric_quantity(
    plan: &ProductionPlan,
    index: usize,
    proposed: &str,
) -> ValidationResult {
    let Some(proposed) = positive(proposed) else {
        return ValidationResult::invalid("Quantity must be greater than 0");
    };
    let Some(order_total) = positive(&plan.total_order_quantity) else {
        return ValidationResult::invalid(
            "Set the total order quantity before allocating fabric quantities",
        );
    };

    let Some(others) = sum_quantities(
        plan.fabrics
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, f)| f.quantity.as_str()),
    ) else {
        return ValidationResult::invalid(QUANTITY_TOO_LARGE);
    };

    let mut errors = Vec::new();
    if proposed.checked_add(others).is_none_or(|sum| sum > order_total) {
        errors.push(format!(
            "Fabric quantities cannot exceed total order quantity ({order_total}); {} remaining",
            order_total.saturating_sub(others).max(Decimal::ZERO)
        ));
    }

    if let Some(fabric) = plan.fabrics.get(index) {
        let Some(allocated) = colors_allocated(fabric) else {
            return ValidationResult::invalid(QUANTITY_TOO_LARGE);
        };
        if proposed < allocated {
            errors.push(format!(
                "Quantity cannot be less than the {allocated} already allocated to colors"
            ));
        }
    }

    ValidationResult::from_errors(errors)
}

/// May color `color_index` of `fabric` have its quantity set to `proposed`?
///
/// An empty value counts as zero so a color quantity can be cleared.
pub fn check_color_quantity(
    fabric: &FabricDetails,
    color_index: usize,
    proposed: &str,
) -> ValidationResult {
    let proposed = if is_blank(proposed) {
        Decimal::ZERO
    } else {
        match parse_quantity(proposed) {
            Some(v) if v >= Decimal::ZERO => v,
            _ => return ValidationResult::invalid("Color quantity must be 0 or more"),
        }
    };
    let Some(fabric_quantity) = positive(&fabric.quantity) else {
        return ValidationResult::invalid("Set the fabric quantity before allocating colors");
    };

    let Some(others) = sum_quantities(
        fabric
            .colors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != color_index)
            .map(|(_, c)| c.quantity.as_str()),
    ) else {
        return ValidationResult::invalid(QUANTITY_TOO_LARGE);
    };

    if proposed.checked_add(others).is_none_or(|sum| sum > fabric_quantity) {
        return ValidationResult::invalid(format!(
            "Color quantities cannot exceed fabric quantity ({fabric_quantity}); {} remaining",
            fabric_quantity.saturating_sub(others).max(Decimal::ZERO)
        ));
    }

    ValidationResult::valid()
}

/// May a new color be added to `fabric`? Only while some of its quantity is
/// still unallocated.
pub fn check_add_color(fabric: &FabricDetails) -> ValidationResult {
    let Some(fabric_quantity) = positive(&fabric.quantity) else {
        return ValidationResult::invalid("Set the fabric quantity before adding colors");
    };

    let Some(allocated) = colors_allocated(fabric) else {
        return ValidationResult::invalid(QUANTITY_TOO_LARGE);
    };
    if allocated >= fabric_quantity {
        return ValidationResult::invalid(format!(
            "All {fabric_quantity} of the fabric quantity is already allocated to colors"
        ));
    }

    ValidationResult::valid()
}

/// May the order total be set to `proposed`?
///
/// A numeric total may not drop below what the fabrics already hold.
/// Anything else is accepted here and reported by the basic-info validator.
pub fn check_total_order_quantity(plan: &ProductionPlan, proposed: &str) -> ValidationResult {
    let Some(proposed) = parse_quantity(proposed) else {
        return ValidationResult::valid();
    };

    let Some(allocated) = sum_quantities(plan.fabrics.iter().map(|f| f.quantity.as_str())) else {
        return ValidationResult::invalid(QUANTITY_TOO_LARGE);
    };
    if allocated > Decimal::ZERO && proposed < allocated {
        return ValidationResult::invalid(format!(
            "Total order quantity cannot be less than the {allocated} already allocated to fabrics"
        ));
    }

    ValidationResult::valid()
}

/// Material needed for one fabric line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricRequirement {
    pub name: String,
    pub quantity: Decimal,
    /// Share of the order total, to one decimal place.
    pub share_percent: Option<Decimal>,
    /// `per_piece_requirement * quantity`, to two decimal places. `None`
    /// when the product does not fit in a [`Decimal`].
    pub total_required: Option<Decimal>,
    pub unit: Unit,
}

/// Running totals of a plan's fabric allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    /// Sum of the fabric quantities; `None` past the decimal range.
    pub allocated: Option<Decimal>,
    pub order_total: Option<Decimal>,
    pub allocated_percent: Option<Decimal>,
    pub fabrics: Vec<FabricRequirement>,
}

impl AllocationSummary {
    /// Order quantity not yet given to any fabric.
    pub fn remaining(&self) -> Option<Decimal> {
        self.order_total?.checked_sub(self.allocated?)
    }
}

fn percent_of(part: Decimal, whole: Option<Decimal>) -> Option<Decimal> {
    let whole = whole.filter(|w| *w > Decimal::ZERO)?;
    let percent = part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)?;
    Some(round_half_up(percent, 1))
}

/// Summarizes how much of the order the fabrics cover.
pub fn allocation_summary(plan: &ProductionPlan) -> AllocationSummary {
    let order_total = parse_quantity(&plan.total_order_quantity);
    let allocated = sum_quantities(plan.fabrics.iter().map(|f| f.quantity.as_str()));

    let fabrics = plan
        .fabrics
        .iter()
        .map(|f| {
            let quantity = parse_quantity(&f.quantity).unwrap_or_default();
            let per_piece = parse_quantity(&f.per_piece_requirement).unwrap_or_default();
            FabricRequirement {
                name: f.name.clone(),
                quantity,
                share_percent: percent_of(quantity, order_total),
                total_required: per_piece
                    .checked_mul(quantity)
                    .map(|total| round_half_up(total, 2)),
                unit: f.unit,
            }
        })
        .collect();

    AllocationSummary {
        allocated,
        order_total,
        allocated_percent: allocated.and_then(|a| percent_of(a, order_total)),
        fabrics,
    }
}
