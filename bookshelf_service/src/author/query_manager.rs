use bookshelf_api::model::author::{Author, AuthorId};
use tracing::info;

use crate::{
    author::repository::AuthorRepositoryArc,
    error::{AppResult, StoreContext},
};

/// Read access to authors.
///
/// Returned authors carry deferred book links.
#[derive(Debug, Clone)]
pub struct AuthorQueryManager {
    author_repository: AuthorRepositoryArc,
}

impl AuthorQueryManager {
    pub fn new(author_repository: AuthorRepositoryArc) -> Self {
        Self { author_repository }
    }

    /// Lists all authors in creation order.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    #[tracing::instrument(skip(self))]
    pub async fn query_all(&self) -> AppResult<Vec<Author>> {
        let records = self
            .author_repository
            .select_all()
            .await
            .context("list authors", "authors")?;
        info!(count = records.len(), "Listed authors");

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn query_single(&self, id: AuthorId) -> AppResult<Option<Author>> {
        let record = self
            .author_repository
            .select(&id)
            .await
            .context("get author", id.to_name())?;

        Ok(record.map(Into::into))
    }
}
