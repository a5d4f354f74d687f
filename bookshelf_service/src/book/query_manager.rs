use bookshelf_api::model::book::{Book, BookId};
use tracing::info;

use crate::{
    book::repository::BookRepositoryArc,
    error::{AppResult, StoreContext},
};

/// Read access to books.
///
/// Returned books reference their author by ID only.
#[derive(Debug, Clone)]
pub struct BookQueryManager {
    book_repository: BookRepositoryArc,
}

impl BookQueryManager {
    pub fn new(book_repository: BookRepositoryArc) -> Self {
        BookQueryManager { book_repository }
    }

    /// Lists all books in creation order.
    ///
    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    #[tracing::instrument(skip(self))]
    pub async fn query_all(&self) -> AppResult<Vec<Book>> {
        let records = self
            .book_repository
            .select_all()
            .await
            .context("list books", "books")?;
        info!(count = records.len(), "Listed books");

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn query_single(&self, id: BookId) -> AppResult<Option<Book>> {
        let record = self
            .book_repository
            .select(&id)
            .await
            .context("get book", id.to_name())?;

        Ok(record.map(Into::into))
    }
}
