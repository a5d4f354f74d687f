use bookshelf_api::model::author::AuthorId;
use tracing::{info, warn};

use crate::{
    author::repository::AuthorRepositoryArc,
    book::repository::BookRepositoryArc,
    error::{AppResult, StoreContext},
};

/// Command for deleting authors together with their books.
///
/// The author is removed first and its books second. Between the two steps
/// readers may observe books whose author is gone.
#[derive(Debug, Clone)]
pub struct DeleteAuthorCommand {
    author_repository: AuthorRepositoryArc,
    book_repository: BookRepositoryArc,
}

impl DeleteAuthorCommand {
    pub fn new(author_repository: AuthorRepositoryArc, book_repository: BookRepositoryArc) -> Self {
        Self {
            author_repository,
            book_repository,
        }
    }

    /// Executes the author deletion command.
    ///
    /// # Returns
    ///
    /// `false` when no author has the given ID.
    ///
    /// # Errors
    ///
    /// Returns a store error if either deletion fails.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: AuthorId) -> AppResult<bool> {
        let target = id.to_name();

        let deleted = self
            .author_repository
            .delete(&id)
            .await
            .context("delete author", &target)?;
        if deleted.is_none() {
            warn!(author_id = %id, "Author to delete not found");
            return Ok(false);
        }

        let book_count = self
            .book_repository
            .delete_by_author(&id)
            .await
            .context("delete author books", &target)?;

        info!(author_id = %id, book_count, "Deleted author and books");

        Ok(true)
    }
}
