//! Relationship resolution between authors and books.
//!
//! Relationship fields come out of the store either already materialized or
//! as bare references. The resolver turns both shapes into the related
//! entities, touching the store only when nothing was materialized.

use bookshelf_api::model::{
    author::Author,
    book::{AuthorLink, Book},
};
use tracing::{debug, warn};

use crate::{
    author::repository::AuthorRepositoryArc,
    book::repository::BookRepositoryArc,
    error::{AppResult, StoreContext},
};

#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    author_repository: AuthorRepositoryArc,
    book_repository: BookRepositoryArc,
}

impl RelationshipResolver {
    pub fn new(author_repository: AuthorRepositoryArc, book_repository: BookRepositoryArc) -> Self {
        Self {
            author_repository,
            book_repository,
        }
    }

    /// Produces the author owning `book`.
    ///
    /// A resolved link is returned as is. A reference is fetched by ID, and a
    /// reference to a missing author yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    #[tracing::instrument(skip(self, book), fields(book_id = %book.id))]
    pub async fn resolve_author_of(&self, book: &Book) -> AppResult<Option<Author>> {
        let author_id = match &book.author {
            AuthorLink::Resolved(author) => return Ok(Some(author.as_ref().clone())),
            AuthorLink::Reference(author_id) => *author_id,
        };

        debug!(author_id = %author_id, "Populating book author");
        let author = self
            .author_repository
            .select(&author_id)
            .await
            .context("resolve author", author_id.to_name())?;
        if author.is_none() {
            warn!(author_id = %author_id, "Book references a missing author");
        }

        Ok(author.map(Into::into))
    }

    /// Produces the books referencing `author`.
    ///
    /// A non-empty embedded list is returned as is. Otherwise the books are
    /// queried by author ID, yielding an empty list when there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    #[tracing::instrument(skip(self, author), fields(author_id = %author.id))]
    pub async fn resolve_books_of(&self, author: &Author) -> AppResult<Vec<Book>> {
        if let Some(books) = author.books.populated() {
            return Ok(books.to_vec());
        }

        debug!("Populating author books");
        let books = self
            .book_repository
            .select_by_author(&author.id)
            .await
            .context("resolve books", author.id.to_name())?;

        Ok(books.into_iter().map(Into::into).collect())
    }

    /// Returns `book` with its author link resolved, when the author exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn expand_book(&self, mut book: Book) -> AppResult<Book> {
        if let Some(author) = self.resolve_author_of(&book).await? {
            book.author = author.into();
        }
        Ok(book)
    }
}
