use async_trait::async_trait;

use plan_core::db::{DbConfig, RepositoryError, RepositoryFactory, SubmissionRepository};

use crate::repository::JsonFileRepository;

/// [`RepositoryFactory`] for the single-file JSON log.
///
/// `config.connection_string` is the path of the log file. The file is
/// created on the first append; its directory must already exist.
pub struct JsonRepositoryFactory;

#[async_trait]
impl RepositoryFactory for JsonRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SubmissionRepository>, RepositoryError> {
        if config.connection_string.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "json backend needs a file path".to_string(),
            ));
        }
        Ok(Box::new(JsonFileRepository::new(&config.connection_string)))
    }
}
