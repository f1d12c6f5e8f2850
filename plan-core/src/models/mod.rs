mod catalog;
mod fabric;
mod production_plan;
mod submission;

pub use catalog::Catalog;
pub use fabric::{ColorQuantity, FabricDetails, Unit};
pub use production_plan::{MAJOR_FABRIC_NONE, ProductionPlan};
pub use submission::Submission;
