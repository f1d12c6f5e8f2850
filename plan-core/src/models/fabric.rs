use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metre,
    Kg,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metre => "metre",
            Self::Kg => "kg",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One color allocation inside a fabric line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorQuantity {
    pub color: String,
    pub quantity: String,
}

/// A fabric line item of a production plan.
///
/// Numeric fields are kept exactly as entered; they are parsed when
/// validated (see [`crate::validation::parse_quantity`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FabricDetails {
    pub name: String,
    pub per_piece_requirement: String,
    pub unit: Unit,
    pub processes: Vec<String>,
    pub colors: Vec<ColorQuantity>,
    pub quantity: String,
    pub skipped_stages: Vec<String>,
}

impl FabricDetails {
    /// An unnamed line item, as added by the "Add New Fabric" action.
    pub fn blank() -> Self {
        Self::default()
    }
}
