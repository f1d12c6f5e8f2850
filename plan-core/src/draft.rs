//! The in-memory draft of a production plan and the edits that change it.
//!
//! Every change to a draft goes through [`PlanDraft::apply`], which checks
//! the edit against the catalog and the allocation guards *before* touching
//! the plan. A rejected edit leaves the draft exactly as it was.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Catalog, ColorQuantity, FabricDetails, ProductionPlan, Unit};
use crate::validation::{
    ValidationResult, check_add_color, check_color_quantity, check_fabric_quantity,
    check_total_order_quantity, validate_fabric_selection,
};

/// One change to a draft plan.
///
/// Fabric and color positions are 0-based indexes into the draft's lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", content = "args")]
pub enum PlanEdit {
    SetStartDate(String),
    SetEndDate(String),
    SetProductionPerDay(String),
    SetTotalOrderQuantity(String),

    AddFabric,
    RemoveFabric(usize),
    SetFabricName(usize, String),
    SetPerPieceRequirement(usize, String),
    SetUnit(usize, Unit),
    ToggleProcess(usize, String),
    SetFabricQuantity(usize, String),
    ToggleSkippedStage(usize, String),

    AddColor(usize),
    RemoveColor(usize, usize),
    SetColorName(usize, usize, String),
    SetColorQuantity(usize, usize, String),

    SetHasInternationalFabric(bool),
    ToggleChinaFabric(String),
    SetMajorFabric(String),
}

/// Why an edit was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no fabric at position {0}")]
    NoSuchFabric(usize),

    #[error("fabric {fabric} has no color at position {color}")]
    NoSuchColor { fabric: usize, color: usize },

    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),
}

impl EditError {
    fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(vec![message.into()])
    }

    /// The individual messages to show the user.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Rejected(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Turns a failed guard into a rejection.
fn guard(result: ValidationResult) -> Result<(), EditError> {
    if result.is_valid {
        Ok(())
    } else {
        Err(EditError::Rejected(result.errors))
    }
}

/// Adds `item` to `set` if absent, removes it if present.
fn toggle(set: &mut Vec<String>, item: String) {
    if let Some(pos) = set.iter().position(|s| *s == item) {
        set.remove(pos);
    } else {
        set.push(item);
    }
}

/// A production plan being edited, bound to the catalog it draws from.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    plan: ProductionPlan,
    catalog: Arc<Catalog>,
}

impl Default for PlanDraft {
    fn default() -> Self {
        Self::new(Catalog::global())
    }
}

impl PlanDraft {
    /// An empty draft.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            plan: ProductionPlan::new(),
            catalog,
        }
    }

    pub fn plan(&self) -> &ProductionPlan {
        &self.plan
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Hands out the plan and leaves an empty one in its place.
    pub fn take(&mut self) -> ProductionPlan {
        std::mem::take(&mut self.plan)
    }

    /// Catalog fabrics no line item has chosen yet.
    pub fn available_fabrics(&self) -> Vec<String> {
        self.catalog.available_fabrics(self.plan.fabric_names())
    }

    fn fabric(&self, index: usize) -> Result<&FabricDetails, EditError> {
        self.plan
            .fabrics
            .get(index)
            .ok_or(EditError::NoSuchFabric(index))
    }

    fn fabric_mut(&mut self, index: usize) -> Result<&mut FabricDetails, EditError> {
        self.plan
            .fabrics
            .get_mut(index)
            .ok_or(EditError::NoSuchFabric(index))
    }

    fn color_mut(&mut self, fabric: usize, color: usize) -> Result<&mut ColorQuantity, EditError> {
        self.fabric_mut(fabric)?
            .colors
            .get_mut(color)
            .ok_or(EditError::NoSuchColor { fabric, color })
    }

    /// Applies `edit`, or rejects it and leaves the draft untouched.
    pub fn apply(&mut self, edit: PlanEdit) -> Result<(), EditError> {
        let result = self.apply_inner(&edit);
        match &result {
            Ok(()) => debug!(?edit, "edit applied"),
            Err(e) => warn!(?edit, error = %e, "edit rejected"),
        }
        result
    }

    fn apply_inner(&mut self, edit: &PlanEdit) -> Result<(), EditError> {
        match edit.clone() {
            PlanEdit::SetStartDate(v) => self.plan.start_date = v,
            PlanEdit::SetEndDate(v) => self.plan.end_date = v,
            PlanEdit::SetProductionPerDay(v) => self.plan.production_per_day = v,
            PlanEdit::SetTotalOrderQuantity(v) => {
                guard(check_total_order_quantity(&self.plan, &v))?;
                self.plan.total_order_quantity = v;
            }

            PlanEdit::AddFabric => {
                if self.plan.fabrics.len() >= self.catalog.fabrics.len() {
                    return Err(EditError::rejected("Maximum fabric limit reached"));
                }
                self.plan.fabrics.push(FabricDetails::blank());
            }
            PlanEdit::RemoveFabric(i) => {
                self.fabric(i)?;
                let removed = self.plan.fabrics.remove(i);
                self.forget_fabric_name(&removed.name);
            }
            PlanEdit::SetFabricName(i, name) => self.rename_fabric(i, name)?,
            PlanEdit::SetPerPieceRequirement(i, v) => self.fabric_mut(i)?.per_piece_requirement = v,
            PlanEdit::SetUnit(i, unit) => self.fabric_mut(i)?.unit = unit,
            PlanEdit::ToggleProcess(i, process) => {
                self.fabric(i)?;
                if !self.catalog.has_process(&process) {
                    return Err(EditError::rejected(format!("Unknown process '{process}'")));
                }
                toggle(&mut self.fabric_mut(i)?.processes, process);
            }
            PlanEdit::SetFabricQuantity(i, v) => {
                self.fabric(i)?;
                guard(check_fabric_quantity(&self.plan, i, &v))?;
                self.fabric_mut(i)?.quantity = v;
            }
            PlanEdit::ToggleSkippedStage(i, stage) => {
                self.fabric(i)?;
                if !self.catalog.has_stage(&stage) {
                    return Err(EditError::rejected(format!("Unknown stage '{stage}'")));
                }
                toggle(&mut self.fabric_mut(i)?.skipped_stages, stage);
            }

            PlanEdit::AddColor(i) => {
                guard(check_add_color(self.fabric(i)?))?;
                self.fabric_mut(i)?.colors.push(ColorQuantity::default());
            }
            PlanEdit::RemoveColor(i, c) => {
                self.color_mut(i, c)?;
                self.fabric_mut(i)?.colors.remove(c);
            }
            PlanEdit::SetColorName(i, c, name) => self.color_mut(i, c)?.color = name,
            PlanEdit::SetColorQuantity(i, c, v) => {
                self.color_mut(i, c)?;
                guard(check_color_quantity(self.fabric(i)?, c, &v))?;
                self.color_mut(i, c)?.quantity = v;
            }

            PlanEdit::SetHasInternationalFabric(value) => {
                self.plan.has_international_fabric = Some(value);
                if !value {
                    self.plan.china_fabrics.clear();
                }
            }
            PlanEdit::ToggleChinaFabric(name) => {
                if self.plan.has_international_fabric != Some(true) {
                    return Err(EditError::rejected(
                        "China fabrics can only be selected when international fabric is Yes",
                    ));
                }
                if !self.plan.has_fabric_named(&name) {
                    return Err(EditError::rejected(format!(
                        "'{name}' is not one of your selected fabrics"
                    )));
                }
                toggle(&mut self.plan.china_fabrics, name);
            }
            PlanEdit::SetMajorFabric(name) => self.plan.major_fabric = name,
        }
        Ok(())
    }

    fn rename_fabric(&mut self, index: usize, name: String) -> Result<(), EditError> {
        let old = self.fabric(index)?.name.clone();
        if old == name {
            return Ok(());
        }
        if !self.catalog.has_fabric(&name) {
            return Err(EditError::rejected(format!("Unknown fabric '{name}'")));
        }
        let siblings: Vec<&str> = self.plan.fabric_names().collect();
        guard(validate_fabric_selection(&name, &siblings))?;

        self.fabric_mut(index)?.name = name.clone();
        for china in self.plan.china_fabrics.iter_mut() {
            if *china == old {
                *china = name.clone();
            }
        }
        // The major fabric is picked again once the name is settled.
        if !old.is_empty() && self.plan.major_fabric == old {
            self.plan.major_fabric.clear();
        }
        Ok(())
    }

    /// Drops references to a fabric name that no line item carries anymore.
    fn forget_fabric_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.plan.china_fabrics.retain(|n| n != name);
        if self.plan.major_fabric == name {
            self.plan.major_fabric.clear();
        }
    }
}
