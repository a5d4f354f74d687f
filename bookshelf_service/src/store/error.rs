use std::error::Error;

use thiserror::Error;

/// Failure reported by a repository backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would break a unique index.
    #[error("unique index `{index}` already holds `{value}`")]
    UniqueViolation { index: &'static str, value: String },

    /// The store was shut down.
    #[error("store is closed")]
    Closed,

    #[error("backend error: {0}")]
    Backend(#[from] Box<dyn Error + Send + Sync>),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_unique_violation(&self, index: &str) -> bool {
        matches!(self, Self::UniqueViolation { index: violated, .. } if *violated == index)
    }
}
