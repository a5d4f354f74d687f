use bookshelf_api::model::{
    author::{Author, AuthorId},
    book::{Book, BookId},
};
use tracing::debug;

use crate::{
    author::query_manager::AuthorQueryManager, book::query_manager::BookQueryManager,
    error::AppResult,
};

/// Read operations.
///
/// Relationship fields of returned entities are left unresolved.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    author_query_manager: AuthorQueryManager,
    book_query_manager: BookQueryManager,
}

impl QueryEngine {
    pub fn new(
        author_query_manager: AuthorQueryManager,
        book_query_manager: BookQueryManager,
    ) -> Self {
        Self {
            author_query_manager,
            book_query_manager,
        }
    }

    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn books(&self) -> AppResult<Vec<Book>> {
        self.book_query_manager.query_all().await
    }

    /// Gets a book by bare ID or `books/{id}` name.
    ///
    /// An ID that cannot be parsed matches no book.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn book(&self, id: &str) -> AppResult<Option<Book>> {
        let Ok(id) = BookId::parse(id) else {
            debug!(id = %id, "Malformed book ID");
            return Ok(None);
        };
        self.book_query_manager.query_single(id).await
    }

    /// # Errors
    ///
    /// Returns a store error if the listing fails.
    pub async fn authors(&self) -> AppResult<Vec<Author>> {
        self.author_query_manager.query_all().await
    }

    /// Gets an author by bare ID or `authors/{id}` name.
    ///
    /// An ID that cannot be parsed matches no author.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn author(&self, id: &str) -> AppResult<Option<Author>> {
        let Ok(id) = AuthorId::parse(id) else {
            debug!(id = %id, "Malformed author ID");
            return Ok(None);
        };
        self.author_query_manager.query_single(id).await
    }
}
