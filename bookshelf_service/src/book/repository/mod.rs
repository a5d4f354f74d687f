use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use bookshelf_api::model::{
    author::AuthorId,
    book::{AuthorLink, Book, BookId},
};
use bookshelf_common::date_time::UtcDateTime;

use crate::store::error::StoreResult;

/// In-memory repository implementation.
pub mod memory;

/// Unique index over book titles.
pub const BOOK_TITLE_INDEX: &str = "books.title";

/// Book record for insertion operations.
///
/// Contains all required fields for creating a new book record.
#[derive(Debug)]
pub struct BookRecordInsert {
    /// Unique identifier for the book
    pub id: BookId,
    /// Timestamp when the book was created
    pub create_time: UtcDateTime,
    /// Title of the book
    pub title: String,
    /// Short description of the book
    pub synopsis: Option<String>,
    /// Identifier of the owning author
    pub author_id: AuthorId,
}

/// Complete book record as stored.
///
/// The author is held as a bare identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecordOwned {
    /// Unique identifier for the book
    pub id: BookId,
    /// Timestamp when the book was created
    pub create_time: UtcDateTime,
    /// Timestamp when the book was last updated
    pub update_time: Option<UtcDateTime>,
    /// Title of the book
    pub title: String,
    /// Short description of the book
    pub synopsis: Option<String>,
    /// Identifier of the owning author
    pub author_id: AuthorId,
}

/// Book record for update operations.
///
/// Contains optional fields for updating an existing book record.
/// Only provided fields will be updated during the operation.
#[derive(Debug)]
pub struct BookRecordUpdate<'a> {
    /// Unique identifier for the book to update
    pub id: &'a BookId,
    /// New update timestamp
    pub update_time: UtcDateTime,
    /// New title
    pub title: Option<&'a str>,
    /// New synopsis
    pub synopsis: Option<&'a str>,
    /// New author identifier
    pub author_id: Option<AuthorId>,
}

/// Repository trait for book data operations.
#[async_trait]
pub trait BookRepository: Debug {
    /// Inserts a new book record and returns it.
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`BOOK_TITLE_INDEX`] when the title is taken.
    async fn insert(&self, record: BookRecordInsert) -> StoreResult<BookRecordOwned>;

    /// Updates an existing book record.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` when no book has the given ID.
    async fn update(&self, update: BookRecordUpdate<'_>) -> StoreResult<Option<BookRecordOwned>>;

    /// Selects a book record by ID.
    async fn select(&self, id: &BookId) -> StoreResult<Option<BookRecordOwned>>;

    /// Selects all books in creation order.
    async fn select_all(&self) -> StoreResult<Vec<BookRecordOwned>>;

    /// Selects the book with exactly this title.
    async fn select_by_title(&self, title: &str) -> StoreResult<Option<BookRecordOwned>>;

    /// Selects all books referencing the author, in creation order.
    async fn select_by_author(&self, author_id: &AuthorId) -> StoreResult<Vec<BookRecordOwned>>;

    /// Deletes a book and returns the removed record, if any.
    async fn delete(&self, id: &BookId) -> StoreResult<Option<BookRecordOwned>>;

    /// Deletes all books referencing the author.
    ///
    /// # Returns
    ///
    /// The number of deleted books.
    async fn delete_by_author(&self, author_id: &AuthorId) -> StoreResult<usize>;

    /// Shuts the repository down; later calls fail with `StoreError::Closed`.
    async fn close(&self) -> StoreResult<()>;
}

/// Thread-safe shared reference to a book repository.
pub type BookRepositoryArc = Arc<dyn BookRepository + Send + Sync>;

impl From<BookRecordOwned> for Book {
    fn from(record: BookRecordOwned) -> Self {
        Book {
            id: record.id,
            title: record.title,
            synopsis: record.synopsis,
            author: AuthorLink::Reference(record.author_id),
            create_time: record.create_time,
            update_time: record.update_time,
        }
    }
}
