//! Wiring between the command line and the planning core.

use std::io::Write;

use plan_core::db::RepositoryRegistry;
use plan_core::{EditError, PlanDraft, PlanEdit, Step, ValidationResult, Wizard, validate_step};
use plan_db_json::JsonRepositoryFactory;
use plan_db_sqlite::SqliteRepositoryFactory;

use crate::plan_file::PlanFile;

/// Build the registry with every backend compiled into this binary.
///
/// To add a backend: add its crate as a dependency and register its
/// factory here. Nothing else changes.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(JsonRepositoryFactory));
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// An edit from a plan file that the draft refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub step: Step,
    pub edit: PlanEdit,
    pub error: EditError,
}

/// What happened while a plan file was entered into a wizard.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    pub rejections: Vec<Rejection>,
    /// The step that refused to advance, with its errors.
    pub blocked: Option<(Step, ValidationResult)>,
}

impl Replay {
    pub fn reached_last_step(&self) -> bool {
        self.blocked.is_none()
    }
}

fn apply_recorded(
    step: Step,
    edit: PlanEdit,
    apply: impl FnOnce(PlanEdit) -> Result<(), EditError>,
    rejections: &mut Vec<Rejection>,
) {
    if let Err(error) = apply(edit.clone()) {
        rejections.push(Rejection { step, edit, error });
    }
}

/// Enters `plan` into `wizard` one step at a time, advancing after each.
///
/// Stops at the first step that does not validate; the wizard is left on
/// that step. Rejected edits are recorded and skipped, as a form simply
/// keeps its previous value.
pub fn replay(wizard: &mut Wizard, plan: &PlanFile) -> Replay {
    let mut report = Replay::default();

    for step in Step::ALL {
        for edit in plan.edits_for(step) {
            apply_recorded(step, edit, |e| wizard.apply(e), &mut report.rejections);
        }
        if step.is_last() {
            break;
        }
        if let Err(result) = wizard.next() {
            report.blocked = Some((step, result));
            break;
        }
    }

    report
}

/// Enters every edit of `plan` into `draft` without any step gating.
pub fn fill_draft(draft: &mut PlanDraft, plan: &PlanFile) -> Vec<Rejection> {
    let mut rejections = Vec::new();
    for step in Step::ALL {
        for edit in plan.edits_for(step) {
            apply_recorded(step, edit, |e| draft.apply(e), &mut rejections);
        }
    }
    rejections
}

/// Validation results for `only`, or for every step.
pub fn validate_plan(draft: &PlanDraft, only: Option<Step>) -> Vec<(Step, ValidationResult)> {
    let steps: Vec<Step> = match only {
        Some(step) => vec![step],
        None => Step::ALL.to_vec(),
    };
    steps
        .into_iter()
        .map(|step| (step, validate_step(step.number(), draft.plan())))
        .collect()
}

/// Prints rejected edits, one line per message.
pub fn print_rejections<W: Write>(rejections: &[Rejection], mut out: W) -> std::io::Result<()> {
    for rejection in rejections {
        for message in rejection.error.messages() {
            writeln!(
                out,
                "rejected on step {} ({:?}): {message}",
                rejection.step.number(),
                rejection.edit
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use plan_core::Catalog;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{AppConfig, Overrides};

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(Catalog::default()))
    }

    const COMPLETE: &str = r#"
        [basic]
        start_date = "2025-09-01"
        end_date = "2025-09-30"
        production_per_day = 20
        total_order_quantity = 100

        [[fabrics]]
        name = "Cotton"
        per_piece_requirement = 1
        processes = ["Dyeing"]
        quantity = 100

        [international]
        has_international_fabric = false
        major_fabric = "none"
    "#;

    #[test]
    fn registry_offers_both_backends() {
        assert_eq!(build_registry().available_backends(), vec!["json", "sqlite"]);
    }

    #[tokio::test]
    async fn configured_backend_is_opened_by_the_registry() {
        let config =
            AppConfig::parse("backend = \"sqlite\"\nconnection_string = \":memory:\"\n").unwrap();

        let log = build_registry().create(&config.db_config()).await.unwrap();

        assert!(log.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn misspelled_backend_flag_lists_the_built_in_backends() {
        let config = AppConfig::default().with_overrides(Overrides {
            backend: Some("sqlte".to_string()),
            ..Overrides::default()
        });

        let err = build_registry()
            .create(&config.db_config())
            .await
            .err()
            .unwrap();

        assert!(err.to_string().contains("choose one of: json, sqlite"));
    }

    #[test]
    fn complete_plan_reaches_the_last_step() {
        let mut w = wizard();

        let report = replay(&mut w, &PlanFile::parse(COMPLETE).unwrap());

        assert!(report.reached_last_step());
        assert!(report.rejections.is_empty());
        assert_eq!(w.step(), Step::InternationalFabrics);
        assert!(w.validate_current().is_valid);
    }

    #[test]
    fn invalid_basic_info_stops_on_first_step() {
        let mut w = wizard();
        let plan = PlanFile::parse("[basic]\nstart_date = \"2025-09-01\"\n").unwrap();

        let report = replay(&mut w, &plan);

        let (step, result) = report.blocked.unwrap();
        assert_eq!(step, Step::BasicInfo);
        assert!(result.errors.contains(&"End date is required".to_string()));
        assert_eq!(w.step(), Step::BasicInfo);
        assert!(w.plan().fabrics.is_empty());
    }

    #[test]
    fn over_allocation_is_rejected_and_blocks_fabric_step() {
        let mut w = wizard();
        let plan = PlanFile::parse(
            r#"
            [basic]
            start_date = "2025-09-01"
            end_date = "2025-09-30"
            production_per_day = 20
            total_order_quantity = 100

            [[fabrics]]
            name = "Cotton"
            per_piece_requirement = 1
            processes = ["Dyeing"]
            quantity = 150
            "#,
        )
        .unwrap();

        let report = replay(&mut w, &plan);

        assert_eq!(report.rejections.len(), 1);
        assert_eq!(
            report.rejections[0].edit,
            PlanEdit::SetFabricQuantity(0, "150".to_string())
        );
        let (step, result) = report.blocked.unwrap();
        assert_eq!(step, Step::FabricDetails);
        assert!(result.errors.contains(&"Fabric 1: Quantity is required".to_string()));
    }

    #[test]
    fn fill_draft_applies_all_steps_without_gating() {
        let mut draft = PlanDraft::new(Arc::new(Catalog::default()));
        let plan = PlanFile::parse(
            r#"
            [[fabrics]]
            name = "Silk"

            [international]
            has_international_fabric = true
            china_fabrics = ["Silk"]
            "#,
        )
        .unwrap();

        let rejections = fill_draft(&mut draft, &plan);

        assert!(rejections.is_empty());
        assert_eq!(draft.plan().china_fabrics, vec!["Silk"]);
    }

    #[test]
    fn validate_plan_reports_one_or_all_steps() {
        let draft = PlanDraft::new(Arc::new(Catalog::default()));

        assert_eq!(validate_plan(&draft, None).len(), 3);
        let only = validate_plan(&draft, Some(Step::FabricDetails));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].1.errors, vec!["At least one fabric must be added"]);
    }

    #[test]
    fn rejections_print_one_line_per_message() {
        let rejections = vec![Rejection {
            step: Step::FabricDetails,
            edit: PlanEdit::AddFabric,
            error: EditError::Rejected(vec!["Maximum fabric limit reached".to_string()]),
        }];
        let mut buf = Vec::new();

        print_rejections(&rejections, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "rejected on step 2 (AddFabric): Maximum fabric limit reached\n"
        );
    }
}
