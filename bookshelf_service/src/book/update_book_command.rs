use bookshelf_api::model::book::{Book, BookId};
use bookshelf_common::date_time::UtcDateTime;
use tracing::{info, warn};

use crate::{
    author::find_or_create_author_command::FindOrCreateAuthorCommand,
    book::{
        repository::{BOOK_TITLE_INDEX, BookRecordUpdate, BookRepositoryArc},
        title_taken,
    },
    error::{AppError, AppResult, StoreContext},
    resolver::RelationshipResolver,
    validation::normalize_title,
};

/// Command for partially updating books, including re-linking them to
/// another author by name.
#[derive(Debug, Clone)]
pub struct UpdateBookCommand {
    book_repository: BookRepositoryArc,
    find_or_create_author: FindOrCreateAuthorCommand,
    resolver: RelationshipResolver,
}

/// Input data for updating a book.
///
/// Only provided fields are written.
#[derive(Debug, Clone)]
pub struct UpdateBookCommandInput<'a> {
    pub id: BookId,
    pub title: Option<&'a str>,
    pub synopsis: Option<&'a str>,
    /// Name of the new owning author, created when missing
    pub author_name: Option<&'a str>,
}

impl UpdateBookCommand {
    pub fn new(
        book_repository: BookRepositoryArc,
        find_or_create_author: FindOrCreateAuthorCommand,
        resolver: RelationshipResolver,
    ) -> Self {
        Self {
            book_repository,
            find_or_create_author,
            resolver,
        }
    }

    /// Executes the book update command.
    ///
    /// # Returns
    ///
    /// The updated book with its author resolved, or `None` when no book has
    /// the given ID.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid title or author name, a
    /// conflict when the title belongs to another book, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: UpdateBookCommandInput<'_>) -> AppResult<Option<Book>> {
        let target = input.id.to_name();

        let existing = self
            .book_repository
            .select(&input.id)
            .await
            .context("get book", &target)?;
        if existing.is_none() {
            warn!(book_id = %input.id, "Book to update not found");
            return Ok(None);
        }

        let title = input.title.map(normalize_title).transpose()?;

        if let Some(title) = title {
            let holder = self
                .book_repository
                .select_by_title(title)
                .await
                .context("find book by title", title)?;
            if let Some(holder) = holder.filter(|holder| holder.id != input.id) {
                return Err(title_taken(title).with_book_id(&holder.id).into());
            }
        }

        let author = match input.author_name {
            Some(author_name) => Some(self.find_or_create_author.execute(author_name).await?.author),
            None => None,
        };

        let updated = self
            .book_repository
            .update(BookRecordUpdate {
                id: &input.id,
                update_time: UtcDateTime::now(),
                title,
                synopsis: input.synopsis,
                author_id: author.as_ref().map(|author| author.id),
            })
            .await;

        let record = match updated {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(book_id = %input.id, "Book deleted during update");
                return Ok(None);
            }
            Err(err) if err.is_unique_violation(BOOK_TITLE_INDEX) => {
                return Err(title_taken(title.unwrap_or_default())
                    .with_book_id(&input.id)
                    .into());
            }
            Err(err) => return Err(AppError::store("update book", &target, err)),
        };

        info!(book_id = %input.id, author_id = %record.author_id, "Updated book");

        let book = Book::from(record);
        match author {
            Some(author) => Ok(Some(Book {
                author: author.into(),
                ..book
            })),
            None => self.resolver.expand_book(book).await.map(Some),
        }
    }
}
