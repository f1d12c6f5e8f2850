pub mod db;
pub mod draft;
pub mod models;
pub mod validation;
pub mod wizard;

pub use db::repository::{RepositoryError, SubmissionRepository};
pub use draft::{EditError, PlanDraft, PlanEdit};
pub use models::*;
pub use validation::{QUANTITY_POLICY, QuantityPolicy, ValidationResult, validate_step};
pub use wizard::{Step, SubmitError, Wizard};
