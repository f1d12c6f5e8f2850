//! Step-by-step wizard over a [`PlanDraft`].
//!
//! The wizard owns the draft for the whole editing session. Moving forward
//! (or submitting) is gated on the current step's validation; moving back is
//! always allowed. A successful submit freezes the draft into a
//! [`Submission`], appends it to the repository and starts over with an
//! empty draft on the first step.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::repository::{RepositoryError, SubmissionRepository};
use crate::draft::{EditError, PlanDraft, PlanEdit};
use crate::models::{Catalog, ProductionPlan, Submission};
use crate::validation::{ValidationResult, validate_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    BasicInfo,
    FabricDetails,
    InternationalFabrics,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::BasicInfo, Step::FabricDetails, Step::InternationalFabrics];

    /// 1-based position, as used by [`validate_step`].
    pub fn number(&self) -> usize {
        match self {
            Self::BasicInfo => 1,
            Self::FabricDetails => 2,
            Self::InternationalFabrics => 3,
        }
    }

    pub fn from_number(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::BasicInfo),
            2 => Some(Self::FabricDetails),
            3 => Some(Self::InternationalFabrics),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::FabricDetails => "Fabric Details",
            Self::InternationalFabrics => "International Fabrics",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::BasicInfo => {
                "Enter the basic production details including dates and quantities."
            }
            Self::FabricDetails => "Add and configure the fabrics needed for production.",
            Self::InternationalFabrics => {
                "Specify international fabric requirements and select the major fabric."
            }
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("the plan can only be submitted from the last step (currently on {0})")]
    NotOnFinalStep(Step),

    #[error("the plan is not valid: {}", .0.errors.join("; "))]
    Invalid(ValidationResult),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One editing session.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    draft: PlanDraft,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(Catalog::global())
    }
}

impl Wizard {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            step: Step::BasicInfo,
            draft: PlanDraft::new(catalog),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &PlanDraft {
        &self.draft
    }

    pub fn plan(&self) -> &ProductionPlan {
        self.draft.plan()
    }

    /// Applies an edit to the draft. See [`PlanDraft::apply`].
    pub fn apply(&mut self, edit: PlanEdit) -> Result<(), EditError> {
        self.draft.apply(edit)
    }

    /// Validation of the current step, without moving.
    pub fn validate_current(&self) -> ValidationResult {
        validate_step(self.step.number(), self.draft.plan())
    }

    /// Moves to the next step if the current one validates.
    ///
    /// On the last step there is nowhere to go; a valid last step stays put.
    pub fn next(&mut self) -> Result<Step, ValidationResult> {
        let result = self.validate_current();
        if !result.is_valid {
            for error in &result.errors {
                warn!(step = self.step.number(), "{error}");
            }
            return Err(result);
        }
        if let Some(next) = self.step.next() {
            debug!(from = self.step.number(), to = next.number(), "advancing");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Moves to the previous step. Never validates; stays on the first step.
    pub fn back(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Validates every step, freezes the draft and appends it to `repo`.
    ///
    /// On success the wizard starts over with an empty draft. If the
    /// repository fails the draft is kept so the user can retry.
    pub async fn submit(
        &mut self,
        repo: &dyn SubmissionRepository,
    ) -> Result<Submission, SubmitError> {
        if !self.step.is_last() {
            return Err(SubmitError::NotOnFinalStep(self.step));
        }

        let result = Step::ALL
            .iter()
            .map(|s| validate_step(s.number(), self.draft.plan()))
            .fold(ValidationResult::valid(), ValidationResult::merge);
        if !result.is_valid {
            return Err(SubmitError::Invalid(result));
        }

        let submission = Submission::new(self.draft.plan().clone());
        repo.append(&submission).await?;
        info!(id = %submission.id, fabrics = submission.plan.fabrics.len(), "plan submitted");

        self.draft.take();
        self.step = Step::BasicInfo;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn steps_are_numbered_from_one() {
        let numbers: Vec<_> = Step::ALL.iter().map(Step::number).collect();

        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(4), None);
    }

    #[test]
    fn step_display_includes_title() {
        assert_eq!(Step::FabricDetails.to_string(), "Step 2: Fabric Details");
    }

    #[test]
    fn only_the_last_step_is_last() {
        assert!(!Step::BasicInfo.is_last());
        assert!(Step::InternationalFabrics.is_last());
    }

    #[test]
    fn next_is_blocked_by_invalid_step() {
        let mut wizard = Wizard::new(Arc::new(Catalog::default()));

        let result = wizard.next();

        assert!(result.is_err());
        assert_eq!(wizard.step(), Step::BasicInfo);
    }

    #[test]
    fn back_is_never_validated() {
        let mut wizard = Wizard::new(Arc::new(Catalog::default()));

        assert_eq!(wizard.back(), Step::BasicInfo);
    }
}
