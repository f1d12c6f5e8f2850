//! Field validators: one concern each.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::common::{is_blank, parse_quantity, sum_quantities};
use super::{QUANTITY_POLICY, QuantityPolicy, ValidationResult};
use crate::models::{FabricDetails, MAJOR_FABRIC_NONE, ProductionPlan};

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| v > Decimal::ZERO)
}

/// Pushes `required` when `value` is blank, or `not_positive` when it does
/// not parse to a number above zero.
fn check_positive(errors: &mut Vec<String>, value: &str, required: &str, not_positive: &str) {
    if is_blank(value) {
        errors.push(required.to_string());
    } else if !is_positive(parse_quantity(value)) {
        errors.push(not_positive.to_string());
    }
}

/// Step 1: dates, daily production and order total.
pub fn validate_basic_info(plan: &ProductionPlan) -> ValidationResult {
    let mut errors = Vec::new();

    let start = if is_blank(&plan.start_date) {
        errors.push("Start date is required".to_string());
        None
    } else {
        let parsed = parse_date(&plan.start_date);
        if parsed.is_none() {
            errors.push("Start date is invalid".to_string());
        }
        parsed
    };

    let end = if is_blank(&plan.end_date) {
        errors.push("End date is required".to_string());
        None
    } else {
        let parsed = parse_date(&plan.end_date);
        if parsed.is_none() {
            errors.push("End date is invalid".to_string());
        }
        parsed
    };

    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        errors.push("Start date must be on or before end date".to_string());
    }

    check_positive(
        &mut errors,
        &plan.production_per_day,
        "Production per day per machine is required",
        "Production per day must be greater than 0",
    );

    check_positive(
        &mut errors,
        &plan.total_order_quantity,
        "Total order quantity is required",
        "Total order quantity must be greater than 0",
    );

    ValidationResult::from_errors(errors)
}

/// Completeness of one fabric line item.
///
/// Colors are not checked here: they are advisory (see
/// [`color_advisories`]).
pub fn validate_fabric_details(fabric: &FabricDetails) -> ValidationResult {
    let mut errors = Vec::new();

    if is_blank(&fabric.name) {
        errors.push("Fabric name is required".to_string());
    }

    check_positive(
        &mut errors,
        &fabric.per_piece_requirement,
        "Per piece requirement is required",
        "Per piece requirement must be greater than 0",
    );

    if fabric.processes.is_empty() {
        errors.push("At least one process must be selected".to_string());
    }

    check_positive(
        &mut errors,
        &fabric.quantity,
        "Quantity is required",
        "Quantity must be greater than 0",
    );

    ValidationResult::from_errors(errors)
}

/// Non-blocking notes about a fabric's color breakdown.
///
/// Never gates a step; the presentation layer shows these next to the
/// fabric.
pub fn color_advisories(fabric: &FabricDetails) -> Vec<String> {
    let mut notes = Vec::new();

    for (i, color) in fabric.colors.iter().enumerate() {
        if is_blank(&color.color) {
            notes.push(format!("Color {} has no name", i + 1));
        }
        if !is_blank(&color.quantity) && parse_quantity(&color.quantity).is_none() {
            notes.push(format!("Color {} quantity is not a number", i + 1));
        }
    }

    if let Some(quantity) = parse_quantity(&fabric.quantity).filter(|q| *q > Decimal::ZERO) {
        let allocated = sum_quantities(fabric.colors.iter().map(|c| c.quantity.as_str()));
        if let Some(allocated) = allocated
            && allocated < quantity
        {
            notes.push(format!(
                "{} of {} not yet allocated to colors",
                quantity.saturating_sub(allocated),
                quantity
            ));
        }
    }

    notes
}

/// Sum of the fabric quantities against the order total, under the
/// configured [`QUANTITY_POLICY`].
pub fn validate_fabrics_quantity(
    fabrics: &[FabricDetails],
    total_order_quantity: &str,
) -> ValidationResult {
    validate_fabrics_quantity_with(QUANTITY_POLICY, fabrics, total_order_quantity)
}

/// Sum of the fabric quantities against the order total, under `policy`.
///
/// An order total that is not a number is left to
/// [`validate_basic_info`]; it produces no error here.
pub fn validate_fabrics_quantity_with(
    policy: QuantityPolicy,
    fabrics: &[FabricDetails],
    total_order_quantity: &str,
) -> ValidationResult {
    let Some(order_total) = parse_quantity(total_order_quantity) else {
        return ValidationResult::valid();
    };

    // A sum past the decimal range is past any order total.
    let Some(total) = sum_quantities(fabrics.iter().map(|f| f.quantity.as_str()))
        .filter(|t| *t <= order_total)
    else {
        return ValidationResult::invalid(
            "Sum of all fabric quantities cannot exceed total order quantity",
        );
    };

    if policy == QuantityPolicy::Exact && total < order_total {
        return ValidationResult::invalid(format!(
            "Sum of all fabric quantities ({total}) must equal total order quantity ({order_total})"
        ));
    }

    ValidationResult::valid()
}

/// Step 3: the international-sourcing declaration and the major fabric.
pub fn validate_international_fabrics(plan: &ProductionPlan) -> ValidationResult {
    let mut errors = Vec::new();

    match plan.has_international_fabric {
        None => errors.push("Please specify if international fabric is present".to_string()),
        Some(true) if plan.china_fabrics.is_empty() => errors.push(
            "Please select at least one China fabric from your selected fabrics".to_string(),
        ),
        Some(true) => {
            for name in &plan.china_fabrics {
                if !plan.has_fabric_named(name) {
                    errors.push(format!("China fabric '{name}' is not one of your selected fabrics"));
                }
            }
        }
        Some(false) => {}
    }

    if plan.has_international_fabric != Some(true) && !plan.china_fabrics.is_empty() {
        errors.push(
            "China fabrics should not be selected when international fabric is No".to_string(),
        );
    }

    if is_blank(&plan.major_fabric) {
        errors.push(
            "Please select a major fabric ('None' or one of your selected fabrics)".to_string(),
        );
    } else if plan.major_fabric != MAJOR_FABRIC_NONE && !plan.has_fabric_named(&plan.major_fabric)
    {
        errors.push("Major fabric must be one of your selected fabrics or 'None'".to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Rejects a fabric name already used by another line item.
pub fn validate_fabric_selection(selected: &str, existing: &[&str]) -> ValidationResult {
    if existing.contains(&selected) {
        ValidationResult::invalid("This fabric has already been selected")
    } else {
        ValidationResult::valid()
    }
}
