pub mod blob;
pub mod factory;
pub mod repository;

pub use blob::{SUBMISSIONS_BLOB_NAME, decode_submissions, encode_submissions};
pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use repository::{RepositoryError, SubmissionRepository};
