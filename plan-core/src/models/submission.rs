use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductionPlan;

/// A frozen production plan, as stored in the submission log.
///
/// The plan's fields are flattened next to `id` and `submittedAt`, so a
/// stored record reads as one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: ProductionPlan,
}

impl Submission {
    /// Freeze `plan` with a fresh id and the current time.
    pub fn new(plan: ProductionPlan) -> Self {
        Self::with_timestamp(plan, Utc::now())
    }

    pub fn with_timestamp(plan: ProductionPlan, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            submitted_at,
            plan,
        }
    }

    /// "International" or "Domestic", as shown on the submission list.
    pub fn sourcing_label(&self) -> &'static str {
        if self.plan.has_international_fabric == Some(true) {
            "International"
        } else {
            "Domestic"
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn plan() -> ProductionPlan {
        ProductionPlan {
            start_date: "2025-03-01".to_string(),
            end_date: "2025-03-31".to_string(),
            production_per_day: "40".to_string(),
            total_order_quantity: "100".to_string(),
            ..ProductionPlan::new()
        }
    }

    #[test]
    fn new_submissions_get_distinct_ids() {
        let a = Submission::new(plan());
        let b = Submission::new(plan());

        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn submission_json_is_flat() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let submission = Submission::with_timestamp(plan(), at);

        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["startDate"], "2025-03-01");
        assert_eq!(json["submittedAt"], "2025-03-01T12:00:00Z");
        assert!(json.get("plan").is_none());
    }

    #[test]
    fn submission_reads_back_from_json() {
        let submission = Submission::new(plan());
        let json = serde_json::to_string(&submission).unwrap();

        let parsed: Submission = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, submission);
    }

    #[test]
    fn sourcing_label_treats_unset_as_domestic() {
        let mut submission = Submission::new(plan());
        assert_eq!(submission.sourcing_label(), "Domestic");

        submission.plan.has_international_fabric = Some(true);
        assert_eq!(submission.sourcing_label(), "International");
    }
}
