use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use plan_core::db::{decode_submissions, encode_submissions};
use plan_core::{RepositoryError, Submission, SubmissionRepository};
use tokio::sync::Mutex;
use tracing::debug;

/// Submission log kept as a JSON array in a single file.
///
/// The whole file is read and rewritten on every append. Writes go to a
/// sibling temp file first and are renamed into place, so a crash mid-write
/// leaves the previous log intact.
pub struct JsonFileRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Use the log at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn read_blob(&self) -> Result<Option<String>, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl SubmissionRepository for JsonFileRepository {
    async fn append(&self, submission: &Submission) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut submissions = decode_submissions(self.read_blob().await?.as_deref())?;
        submissions.push(submission.clone());
        let blob = encode_submissions(&submissions)?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, blob)
            .await
            .map_err(|e| io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;

        debug!(
            id = %submission.id,
            total = submissions.len(),
            path = %self.path.display(),
            "submission appended"
        );
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Submission>, RepositoryError> {
        decode_submissions(self.read_blob().await?.as_deref())
    }
}
