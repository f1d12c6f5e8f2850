use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use plan_core::db::{SUBMISSIONS_BLOB_NAME, decode_submissions, encode_submissions};
use plan_core::{RepositoryError, Submission, SubmissionRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::debug;

/// Submission log kept as a named JSON blob in a SQLite `blobs` table.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect with a sqlx URL such as `sqlite:planner.db?mode=rwc`.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Open a database by path, creating the file if needed. `:memory:`
    /// opens a private in-memory database.
    pub async fn open(path: &str) -> Result<Self, RepositoryError> {
        let options = if path == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| RepositoryError::Configuration(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };

        // One connection: an in-memory database lives and dies with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    async fn read_blob(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
    ) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT value FROM blobs WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }
}

#[async_trait]
impl SubmissionRepository for SqliteRepository {
    async fn append(&self, submission: &Submission) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let current = Self::read_blob(&mut tx, SUBMISSIONS_BLOB_NAME).await?;
        let mut submissions = decode_submissions(current.as_deref())?;
        submissions.push(submission.clone());
        let blob = encode_submissions(&submissions)?;

        sqlx::query(
            "INSERT INTO blobs (name, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(SUBMISSIONS_BLOB_NAME)
        .bind(&blob)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(id = %submission.id, total = submissions.len(), "submission appended");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Submission>, RepositoryError> {
        let blob = sqlx::query_scalar::<_, String>("SELECT value FROM blobs WHERE name = ?")
            .bind(SUBMISSIONS_BLOB_NAME)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        decode_submissions(blob.as_deref())
    }
}
