use serde::{Deserialize, Serialize};

use super::FabricDetails;

/// Value of [`ProductionPlan::major_fabric`] meaning "no major fabric".
pub const MAJOR_FABRIC_NONE: &str = "none";

/// The draft (and, once frozen, the submitted body) of a production plan.
///
/// Every field starts empty; the wizard fills them in step by step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    // Step 1
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub production_per_day: String,
    #[serde(default)]
    pub total_order_quantity: String,

    // Step 2
    #[serde(default)]
    pub fabrics: Vec<FabricDetails>,

    // Step 3
    #[serde(default)]
    pub has_international_fabric: Option<bool>,
    #[serde(default)]
    pub china_fabrics: Vec<String>,
    #[serde(default)]
    pub major_fabric: String,
}

impl ProductionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the fabric line items that have one, in plan order.
    pub fn fabric_names(&self) -> impl Iterator<Item = &str> {
        self.fabrics
            .iter()
            .map(|f| f.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn has_fabric_named(&self, name: &str) -> bool {
        self.fabric_names().any(|n| n == name)
    }
}
