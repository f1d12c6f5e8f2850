//! Plan files: a production plan written down as TOML.
//!
//! A plan file is not a stored plan. It is turned into the sequence of
//! [`PlanEdit`]s a user would have made in the form, one step at a time,
//! so that every catalog check and allocation guard runs exactly as it does
//! for interactive edits.
//!
//! ```toml
//! [basic]
//! start_date = "2025-09-01"
//! end_date = "2025-09-30"
//! production_per_day = 50
//! total_order_quantity = 1000
//!
//! [[fabrics]]
//! name = "Cotton"
//! per_piece_requirement = 1.25
//! unit = "metre"
//! processes = ["Dyeing", "Compacting"]
//! quantity = 600
//! skipped_stages = ["Ironing"]
//! colors = [{ color = "Navy", quantity = 400 }]
//!
//! [international]
//! has_international_fabric = true
//! china_fabrics = ["Cotton"]
//! major_fabric = "Cotton"
//! ```
//!
//! Quantities may be written as TOML numbers or as strings. Every table and
//! key is optional; whatever is missing is simply never entered.

use std::fs;
use std::path::Path;

use plan_core::{PlanEdit, Step, Unit};
use serde::{Deserialize, Deserializer};

#[derive(Debug, thiserror::Error)]
pub enum PlanFileError {
    #[error("cannot read plan file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid plan file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Accepts `60`, `1.25` or `"1,000"` and keeps the text the user would
/// have typed.
fn form_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(|v| match v {
        NumberOrText::Int(n) => n.to_string(),
        NumberOrText::Float(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicSection {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub production_per_day: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub total_order_quantity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorEntry {
    pub color: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FabricEntry {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub per_piece_requirement: Option<String>,
    pub unit: Option<Unit>,
    #[serde(default)]
    pub processes: Vec<String>,
    #[serde(default, deserialize_with = "form_text")]
    pub quantity: Option<String>,
    #[serde(default)]
    pub skipped_stages: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InternationalSection {
    pub has_international_fabric: Option<bool>,
    #[serde(default)]
    pub china_fabrics: Vec<String>,
    pub major_fabric: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    #[serde(default)]
    pub basic: BasicSection,
    #[serde(default)]
    pub fabrics: Vec<FabricEntry>,
    #[serde(default)]
    pub international: InternationalSection,
}

impl PlanFile {
    pub fn parse(text: &str) -> Result<Self, PlanFileError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, PlanFileError> {
        let text = fs::read_to_string(path).map_err(|source| PlanFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// The edits a user makes on `step`, in form order.
    ///
    /// Fabric positions assume the draft had no fabrics when the step
    /// started. A fabric's quantity is entered before its colors, since
    /// colors cannot be added to a fabric with no quantity.
    pub fn edits_for(&self, step: Step) -> Vec<PlanEdit> {
        match step {
            Step::BasicInfo => self.basic_edits(),
            Step::FabricDetails => self.fabric_edits(),
            Step::InternationalFabrics => self.international_edits(),
        }
    }

    fn basic_edits(&self) -> Vec<PlanEdit> {
        let b = &self.basic;
        [
            b.start_date.clone().map(PlanEdit::SetStartDate),
            b.end_date.clone().map(PlanEdit::SetEndDate),
            b.production_per_day.clone().map(PlanEdit::SetProductionPerDay),
            b.total_order_quantity.clone().map(PlanEdit::SetTotalOrderQuantity),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn fabric_edits(&self) -> Vec<PlanEdit> {
        let mut edits = Vec::new();

        for (i, fabric) in self.fabrics.iter().enumerate() {
            edits.push(PlanEdit::AddFabric);
            if let Some(name) = &fabric.name {
                edits.push(PlanEdit::SetFabricName(i, name.clone()));
            }
            if let Some(per_piece) = &fabric.per_piece_requirement {
                edits.push(PlanEdit::SetPerPieceRequirement(i, per_piece.clone()));
            }
            if let Some(unit) = fabric.unit {
                edits.push(PlanEdit::SetUnit(i, unit));
            }
            for process in &fabric.processes {
                edits.push(PlanEdit::ToggleProcess(i, process.clone()));
            }
            if let Some(quantity) = &fabric.quantity {
                edits.push(PlanEdit::SetFabricQuantity(i, quantity.clone()));
            }
            for stage in &fabric.skipped_stages {
                edits.push(PlanEdit::ToggleSkippedStage(i, stage.clone()));
            }
            for (j, color) in fabric.colors.iter().enumerate() {
                edits.push(PlanEdit::AddColor(i));
                if let Some(name) = &color.color {
                    edits.push(PlanEdit::SetColorName(i, j, name.clone()));
                }
                if let Some(quantity) = &color.quantity {
                    edits.push(PlanEdit::SetColorQuantity(i, j, quantity.clone()));
                }
            }
        }

        edits
    }

    fn international_edits(&self) -> Vec<PlanEdit> {
        let intl = &self.international;
        let mut edits = Vec::new();

        if let Some(answer) = intl.has_international_fabric {
            edits.push(PlanEdit::SetHasInternationalFabric(answer));
        }
        for name in &intl.china_fabrics {
            edits.push(PlanEdit::ToggleChinaFabric(name.clone()));
        }
        if let Some(major) = &intl.major_fabric {
            edits.push(PlanEdit::SetMajorFabric(major.clone()));
        }

        edits
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_produces_no_edits() {
        let plan = PlanFile::parse("").unwrap();

        assert_eq!(plan, PlanFile::default());
        assert!(Step::ALL.iter().all(|s| plan.edits_for(*s).is_empty()));
    }

    #[test]
    fn numbers_and_strings_are_both_form_text() {
        let plan = PlanFile::parse(
            r#"
            [basic]
            production_per_day = 50
            total_order_quantity = "1,000"

            [[fabrics]]
            per_piece_requirement = 1.25
            "#,
        )
        .unwrap();

        assert_eq!(plan.basic.production_per_day.as_deref(), Some("50"));
        assert_eq!(plan.basic.total_order_quantity.as_deref(), Some("1,000"));
        assert_eq!(plan.fabrics[0].per_piece_requirement.as_deref(), Some("1.25"));
    }

    #[test]
    fn basic_edits_skip_missing_fields() {
        let plan = PlanFile::parse(
            r#"
            [basic]
            start_date = "2025-09-01"
            total_order_quantity = 100
            "#,
        )
        .unwrap();

        assert_eq!(
            plan.edits_for(Step::BasicInfo),
            vec![
                PlanEdit::SetStartDate("2025-09-01".to_string()),
                PlanEdit::SetTotalOrderQuantity("100".to_string()),
            ]
        );
    }

    #[test]
    fn fabric_quantity_is_entered_before_colors() {
        let plan = PlanFile::parse(
            r#"
            [[fabrics]]
            name = "Silk"
            unit = "kg"
            processes = ["Dyeing"]
            quantity = 40
            colors = [{ color = "Red", quantity = 25 }]
            "#,
        )
        .unwrap();

        assert_eq!(
            plan.edits_for(Step::FabricDetails),
            vec![
                PlanEdit::AddFabric,
                PlanEdit::SetFabricName(0, "Silk".to_string()),
                PlanEdit::SetUnit(0, Unit::Kg),
                PlanEdit::ToggleProcess(0, "Dyeing".to_string()),
                PlanEdit::SetFabricQuantity(0, "40".to_string()),
                PlanEdit::AddColor(0),
                PlanEdit::SetColorName(0, 0, "Red".to_string()),
                PlanEdit::SetColorQuantity(0, 0, "25".to_string()),
            ]
        );
    }

    #[test]
    fn second_fabric_edits_use_its_position() {
        let plan = PlanFile::parse(
            r#"
            [[fabrics]]
            name = "Cotton"

            [[fabrics]]
            name = "Wool"
            "#,
        )
        .unwrap();

        assert_eq!(
            plan.edits_for(Step::FabricDetails),
            vec![
                PlanEdit::AddFabric,
                PlanEdit::SetFabricName(0, "Cotton".to_string()),
                PlanEdit::AddFabric,
                PlanEdit::SetFabricName(1, "Wool".to_string()),
            ]
        );
    }

    #[test]
    fn international_edits_follow_form_order() {
        let plan = PlanFile::parse(
            r#"
            [international]
            has_international_fabric = true
            china_fabrics = ["Cotton", "Silk"]
            major_fabric = "none"
            "#,
        )
        .unwrap();

        assert_eq!(
            plan.edits_for(Step::InternationalFabrics),
            vec![
                PlanEdit::SetHasInternationalFabric(true),
                PlanEdit::ToggleChinaFabric("Cotton".to_string()),
                PlanEdit::ToggleChinaFabric("Silk".to_string()),
                PlanEdit::SetMajorFabric("none".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PlanFile::parse("[basic]\nstart = \"2025-01-01\"\n").unwrap_err();

        assert!(matches!(err, PlanFileError::Parse(_)));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(PlanFile::parse("[[fabrics]]\nunit = \"yard\"\n").is_err());
    }
}
