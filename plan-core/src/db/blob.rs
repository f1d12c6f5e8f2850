//! The persisted layout shared by every backend: one named blob holding a
//! JSON array of [`Submission`] records, read and rewritten in full.

use super::repository::RepositoryError;
use crate::models::Submission;

/// Name under which the submission array is stored.
pub const SUBMISSIONS_BLOB_NAME: &str = "productionFormSubmissions";

/// Reads the submission array out of a stored blob.
///
/// An absent or blank blob is an empty list.
pub fn decode_submissions(blob: Option<&str>) -> Result<Vec<Submission>, RepositoryError> {
    match blob {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text)
            .map_err(|e| RepositoryError::Serialization(format!("corrupt submission log: {e}"))),
        _ => Ok(Vec::new()),
    }
}

pub fn encode_submissions(submissions: &[Submission]) -> Result<String, RepositoryError> {
    serde_json::to_string(submissions).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::ProductionPlan;

    #[test]
    fn absent_blob_is_empty_list() {
        assert!(decode_submissions(None).unwrap().is_empty());
    }

    #[test]
    fn blank_blob_is_empty_list() {
        assert!(decode_submissions(Some("  \n")).unwrap().is_empty());
        assert!(decode_submissions(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn corrupt_blob_is_serialization_error() {
        assert!(matches!(
            decode_submissions(Some("{not json")),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn encoded_blob_decodes_to_same_records() {
        let records = vec![
            Submission::new(ProductionPlan::new()),
            Submission::new(ProductionPlan::new()),
        ];

        let blob = encode_submissions(&records).unwrap();

        assert!(blob.starts_with('['));
        assert_eq!(decode_submissions(Some(&blob)).unwrap(), records);
    }
}
