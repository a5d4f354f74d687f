use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use bookshelf_api::model::author::{Author, AuthorId, BooksLink};
use bookshelf_common::date_time::UtcDateTime;

use crate::store::error::StoreResult;

/// In-memory repository implementation.
pub mod memory;

/// Unique, case-insensitive index over author names.
pub const AUTHOR_NAME_INDEX: &str = "authors.name";

/// Author record for insertion operations.
#[derive(Debug)]
pub struct AuthorRecordInsert {
    pub id: AuthorId,
    pub create_time: UtcDateTime,
    pub name: String,
    pub bio: Option<String>,
}

/// Complete author record as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRecordOwned {
    pub id: AuthorId,
    pub create_time: UtcDateTime,
    pub update_time: Option<UtcDateTime>,
    pub name: String,
    pub bio: Option<String>,
}

/// Author record for update operations.
///
/// Only provided fields are written.
#[derive(Debug)]
pub struct AuthorRecordUpdate<'a> {
    pub id: &'a AuthorId,
    pub update_time: UtcDateTime,
    pub name: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// Persistence operations on the author collection.
#[async_trait]
pub trait AuthorRepository: Debug {
    /// Inserts a new author and returns the stored record.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::UniqueViolation`](crate::store::error::StoreError) on
    /// [`AUTHOR_NAME_INDEX`] when the name is taken, ignoring case.
    async fn insert(&self, record: AuthorRecordInsert) -> StoreResult<AuthorRecordOwned>;

    /// Applies a partial update.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` when no author has the given ID.
    async fn update(&self, update: AuthorRecordUpdate<'_>)
    -> StoreResult<Option<AuthorRecordOwned>>;

    async fn select(&self, id: &AuthorId) -> StoreResult<Option<AuthorRecordOwned>>;

    /// Selects all authors in creation order.
    async fn select_all(&self) -> StoreResult<Vec<AuthorRecordOwned>>;

    /// Selects the author whose name equals `name` ignoring case.
    async fn select_by_name(&self, name: &str) -> StoreResult<Option<AuthorRecordOwned>>;

    /// Deletes an author and returns the removed record, if any.
    async fn delete(&self, id: &AuthorId) -> StoreResult<Option<AuthorRecordOwned>>;

    /// Shuts the repository down; later calls fail with `StoreError::Closed`.
    async fn close(&self) -> StoreResult<()>;
}

/// Thread-safe shared reference to an author repository.
pub type AuthorRepositoryArc = Arc<dyn AuthorRepository + Send + Sync>;

impl From<AuthorRecordOwned> for Author {
    fn from(record: AuthorRecordOwned) -> Self {
        Author {
            id: record.id,
            name: record.name,
            bio: record.bio,
            create_time: record.create_time,
            update_time: record.update_time,
            books: BooksLink::Deferred,
        }
    }
}
