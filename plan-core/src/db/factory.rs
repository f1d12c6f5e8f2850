use std::collections::BTreeMap;

use async_trait::async_trait;

use super::repository::{RepositoryError, SubmissionRepository};

/// Where the submission log lives.
///
/// `backend` picks a registered [`RepositoryFactory`] by name. The
/// `connection_string` is the log's location in that backend's terms: a
/// file path for `json`, a file path or `:memory:` for `sqlite`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub const DEFAULT_BACKEND: &'static str = "json";
    pub const DEFAULT_LOCATION: &'static str = "submissions.json";
}

/// A `submissions.json` file in the working directory.
impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: Self::DEFAULT_BACKEND.to_string(),
            connection_string: Self::DEFAULT_LOCATION.to_string(),
        }
    }
}

/// Opens a submission log in one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// The name `DbConfig::backend` uses to select this factory.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SubmissionRepository>, RepositoryError>;
}

/// The storage backends a binary was built with.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: BTreeMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, in name order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Opens the log `config` points at.
    ///
    /// A backend nobody registered is a [`RepositoryError::Configuration`]
    /// naming the backends that are available.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SubmissionRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "no storage backend named '{}' (choose one of: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };
        factory.create(config).await
    }
}
