use bookshelf_api::model::book::BookId;
use tracing::{info, warn};

use crate::{
    book::repository::BookRepositoryArc,
    error::{AppResult, StoreContext},
};

#[derive(Debug, Clone)]
pub struct DeleteBookCommand {
    book_repository: BookRepositoryArc,
}

impl DeleteBookCommand {
    pub fn new(book_repository: BookRepositoryArc) -> Self {
        Self { book_repository }
    }

    /// Executes the book deletion command.
    ///
    /// # Returns
    ///
    /// `false` when no book has the given ID.
    ///
    /// # Errors
    ///
    /// Returns a store error if the deletion fails.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: BookId) -> AppResult<bool> {
        let deleted = self
            .book_repository
            .delete(&id)
            .await
            .context("delete book", id.to_name())?;

        match deleted {
            Some(book) => {
                info!(book_id = %id, title = %book.title, "Deleted book");
                Ok(true)
            }
            None => {
                warn!(book_id = %id, "Book to delete not found");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bookshelf_api::model::author::AuthorId;
    use bookshelf_common::{date_time::UtcDateTime, id::Id};

    use super::*;
    use crate::book::repository::{BookRecordInsert, BookRepository, memory::MemoryBookRepository};

    fn insert_record(title: &str, author_id: AuthorId) -> BookRecordInsert {
        BookRecordInsert {
            id: BookId::new(Id::generate()),
            create_time: UtcDateTime::now(),
            title: title.into(),
            synopsis: None,
            author_id,
        }
    }

    #[tokio::test]
    async fn delete_and_reuse_title() {
        let repository = Arc::new(MemoryBookRepository::new());
        let author_id = AuthorId::new(Id::generate());
        let book = repository
            .insert(insert_record("Emma", author_id))
            .await
            .unwrap();
        let command = DeleteBookCommand::new(repository.clone());

        assert!(command.execute(book.id).await.unwrap());
        assert!(repository.select(&book.id).await.unwrap().is_none());
        assert!(repository.select_by_title("Emma").await.unwrap().is_none());
        repository
            .insert(insert_record("Emma", author_id))
            .await
            .unwrap();

        assert!(!command.execute(book.id).await.unwrap());
    }
}
