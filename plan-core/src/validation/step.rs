use super::ValidationResult;
use super::fields::{
    validate_basic_info, validate_fabric_details, validate_fabrics_quantity,
    validate_international_fabrics,
};
use crate::models::ProductionPlan;

/// Validates the fields that gate leaving wizard step `step` (1-based).
///
/// * Step 1 checks the basic information.
/// * Step 2 rejects an empty fabric list outright; otherwise every fabric is
///   checked (messages prefixed with its 1-based position) followed by the
///   quantity total.
/// * Step 3 checks the international-sourcing declaration.
///
/// Any other index has nothing to check and is valid.
pub fn validate_step(step: usize, plan: &ProductionPlan) -> ValidationResult {
    match step {
        1 => validate_basic_info(plan),
        2 => {
            if plan.fabrics.is_empty() {
                return ValidationResult::invalid("At least one fabric must be added");
            }

            let fabric_errors = plan
                .fabrics
                .iter()
                .enumerate()
                .flat_map(|(i, fabric)| {
                    validate_fabric_details(fabric)
                        .errors
                        .into_iter()
                        .map(move |e| format!("Fabric {}: {e}", i + 1))
                })
                .collect();

            ValidationResult::from_errors(fabric_errors).merge(validate_fabrics_quantity(
                &plan.fabrics,
                &plan.total_order_quantity,
            ))
        }
        3 => validate_international_fabrics(plan),
        _ => ValidationResult::valid(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{FabricDetails, MAJOR_FABRIC_NONE, Unit};

    fn cotton(quantity: &str) -> FabricDetails {
        FabricDetails {
            name: "Cotton".to_string(),
            per_piece_requirement: "1".to_string(),
            unit: Unit::Metre,
            processes: vec!["Dyeing".to_string()],
            quantity: quantity.to_string(),
            ..FabricDetails::blank()
        }
    }

    fn complete_plan() -> ProductionPlan {
        ProductionPlan {
            start_date: "2025-01-06".to_string(),
            end_date: "2025-02-06".to_string(),
            production_per_day: "25".to_string(),
            total_order_quantity: "100".to_string(),
            fabrics: vec![cotton("100")],
            has_international_fabric: Some(false),
            china_fabrics: vec![],
            major_fabric: MAJOR_FABRIC_NONE.to_string(),
        }
    }

    #[test]
    fn complete_plan_passes_every_step() {
        let plan = complete_plan();

        for step in 1..=3 {
            assert_eq!(validate_step(step, &plan), ValidationResult::valid(), "step {step}");
        }
    }

    #[test]
    fn step_two_short_circuits_on_empty_fabric_list() {
        let plan = ProductionPlan {
            fabrics: vec![],
            total_order_quantity: "nonsense".to_string(),
            ..complete_plan()
        };

        assert_eq!(
            validate_step(2, &plan).errors,
            vec!["At least one fabric must be added"]
        );
    }

    #[test]
    fn step_two_prefixes_fabric_errors_and_appends_quantity_errors() {
        let plan = ProductionPlan {
            fabrics: vec![
                cotton("80"),
                FabricDetails {
                    name: "Silk".to_string(),
                    processes: vec![],
                    ..cotton("30")
                },
                FabricDetails {
                    per_piece_requirement: String::new(),
                    ..cotton("5")
                },
            ],
            ..complete_plan()
        };

        assert_eq!(
            validate_step(2, &plan).errors,
            vec![
                "Fabric 2: At least one process must be selected",
                "Fabric 3: Per piece requirement is required",
                "Sum of all fabric quantities cannot exceed total order quantity",
            ]
        );
    }

    #[test]
    fn step_two_reports_quantities_past_decimal_range() {
        let max = rust_decimal::Decimal::MAX.to_string();
        let plan = ProductionPlan {
            total_order_quantity: max.clone(),
            fabrics: vec![cotton(&max), cotton(&max)],
            ..complete_plan()
        };

        assert_eq!(
            validate_step(2, &plan).errors,
            vec!["Sum of all fabric quantities cannot exceed total order quantity"]
        );
    }

    #[test]
    fn step_three_reports_missing_china_fabrics() {
        let plan = ProductionPlan {
            has_international_fabric: Some(true),
            china_fabrics: vec![],
            ..complete_plan()
        };

        let result = validate_step(3, &plan);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Please select at least one China fabric from your selected fabrics"]
        );
    }

    #[test]
    fn unknown_steps_are_valid() {
        let plan = ProductionPlan::new();

        assert_eq!(validate_step(0, &plan), ValidationResult::valid());
        assert_eq!(validate_step(4, &plan), ValidationResult::valid());
    }

    #[test]
    fn validate_step_does_not_modify_the_plan() {
        let plan = ProductionPlan {
            fabrics: vec![FabricDetails::blank()],
            ..complete_plan()
        };
        let before = plan.clone();

        let first = validate_step(2, &plan);
        let second = validate_step(2, &plan);

        assert_eq!(plan, before);
        assert_eq!(first, second);
    }
}
