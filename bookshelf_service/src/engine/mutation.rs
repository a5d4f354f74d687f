use bookshelf_api::model::{
    author::{Author, AuthorId},
    author_service::{AddAuthorInput, UpdateAuthorInput},
    book::{Book, BookId},
    book_service::{AddBookInput, UpdateBookInput},
};
use tracing::debug;

use crate::{
    author::{
        create_author_command::{CreateAuthorCommand, CreateAuthorCommandInput},
        delete_author_command::DeleteAuthorCommand,
        update_author_command::{UpdateAuthorCommand, UpdateAuthorCommandInput},
    },
    book::{
        create_book_command::{CreateBookCommand, CreateBookCommandInput},
        delete_book_command::DeleteBookCommand,
        update_book_command::{UpdateBookCommand, UpdateBookCommandInput},
    },
    error::AppResult,
};

/// Write operations.
///
/// IDs are accepted bare or as resource names. An ID that cannot be parsed
/// is treated as not found.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    create_author: CreateAuthorCommand,
    update_author: UpdateAuthorCommand,
    delete_author: DeleteAuthorCommand,
    create_book: CreateBookCommand,
    update_book: UpdateBookCommand,
    delete_book: DeleteBookCommand,
}

impl MutationEngine {
    pub fn new(
        create_author: CreateAuthorCommand,
        update_author: UpdateAuthorCommand,
        delete_author: DeleteAuthorCommand,
        create_book: CreateBookCommand,
        update_book: UpdateBookCommand,
        delete_book: DeleteBookCommand,
    ) -> Self {
        Self {
            create_author,
            update_author,
            delete_author,
            create_book,
            update_book,
            delete_book,
        }
    }

    /// Creates an author.
    ///
    /// # Errors
    ///
    /// Fails with a conflict when the name exists, ignoring case.
    pub async fn add_author(&self, input: &AddAuthorInput) -> AppResult<Author> {
        let output = self
            .create_author
            .execute(CreateAuthorCommandInput {
                name: &input.name,
                bio: input.bio.as_deref(),
            })
            .await?;
        Ok(output.author)
    }

    /// Creates a book, finding or creating its author by name.
    ///
    /// The returned book has its author resolved.
    ///
    /// # Errors
    ///
    /// Fails with a conflict when the title exists.
    pub async fn add_book(&self, input: &AddBookInput) -> AppResult<Book> {
        let output = self
            .create_book
            .execute(CreateBookCommandInput {
                title: &input.title,
                author_name: &input.author_name,
                synopsis: input.synopsis.as_deref(),
            })
            .await?;
        Ok(output.book)
    }

    /// # Errors
    ///
    /// Fails with a conflict when renaming onto another author's name.
    pub async fn update_author(
        &self,
        id: &str,
        input: &UpdateAuthorInput,
    ) -> AppResult<Option<Author>> {
        let Ok(id) = AuthorId::parse(id) else {
            debug!(id = %id, "Malformed author ID");
            return Ok(None);
        };
        self.update_author
            .execute(UpdateAuthorCommandInput {
                id,
                name: input.name.as_deref(),
                bio: input.bio.as_deref(),
            })
            .await
    }

    /// Deletes an author and every book referencing it.
    ///
    /// # Errors
    ///
    /// Returns a store error if a deletion fails.
    pub async fn delete_author(&self, id: &str) -> AppResult<bool> {
        let Ok(id) = AuthorId::parse(id) else {
            debug!(id = %id, "Malformed author ID");
            return Ok(false);
        };
        self.delete_author.execute(id).await
    }

    /// # Errors
    ///
    /// Fails with a conflict when renaming onto another book's title.
    pub async fn update_book(&self, id: &str, input: &UpdateBookInput) -> AppResult<Option<Book>> {
        let Ok(id) = BookId::parse(id) else {
            debug!(id = %id, "Malformed book ID");
            return Ok(None);
        };
        self.update_book
            .execute(UpdateBookCommandInput {
                id,
                title: input.title.as_deref(),
                synopsis: input.synopsis.as_deref(),
                author_name: input.author_name.as_deref(),
            })
            .await
    }

    /// # Errors
    ///
    /// Returns a store error if the deletion fails.
    pub async fn delete_book(&self, id: &str) -> AppResult<bool> {
        let Ok(id) = BookId::parse(id) else {
            debug!(id = %id, "Malformed book ID");
            return Ok(false);
        };
        self.delete_book.execute(id).await
    }
}
