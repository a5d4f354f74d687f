use std::sync::Arc;

use bookshelf_api::model::book::{Book, BookId};
use bookshelf_common::{date_time::UtcDateTime, id::worker::WorkerIdGenerator};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    author::find_or_create_author_command::FindOrCreateAuthorCommand,
    book::{
        repository::{BOOK_TITLE_INDEX, BookRecordInsert, BookRepositoryArc},
        title_taken,
    },
    error::{AppError, AppResult, StoreContext},
    validation::normalize_title,
};

/// Command for creating new books.
///
/// The owning author is looked up by name ignoring case and created when
/// missing.
#[derive(Debug, Clone)]
pub struct CreateBookCommand {
    id_generator: Arc<Mutex<WorkerIdGenerator>>,
    book_repository: BookRepositoryArc,
    find_or_create_author: FindOrCreateAuthorCommand,
}

/// Input data for creating a book.
#[derive(Debug, Clone)]
pub struct CreateBookCommandInput<'a> {
    /// Book title, trimmed before use
    pub title: &'a str,
    /// Name of the owning author
    pub author_name: &'a str,
    pub synopsis: Option<&'a str>,
}

/// Output data from book creation.
#[derive(Debug, Clone)]
pub struct CreateBookCommandOutput {
    /// The created book with its author resolved
    pub book: Book,
    /// Whether the author was created for this book
    pub author_created: bool,
}

impl CreateBookCommand {
    /// Creates a new `CreateBookCommand`.
    ///
    /// # Arguments
    ///
    /// * `id_generator` - Generator for creating unique book IDs
    /// * `book_repository` - Repository for persisting book data
    /// * `find_or_create_author` - Resolves the author name to an author
    pub fn new(
        id_generator: Arc<Mutex<WorkerIdGenerator>>,
        book_repository: BookRepositoryArc,
        find_or_create_author: FindOrCreateAuthorCommand,
    ) -> Self {
        Self {
            id_generator,
            book_repository,
            find_or_create_author,
        }
    }

    /// Executes the book creation command.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing title or invalid author name,
    /// a conflict when the title is taken, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        input: CreateBookCommandInput<'_>,
    ) -> AppResult<CreateBookCommandOutput> {
        let title = normalize_title(input.title)?;
        info!(title = %title, "Creating book");

        // A taken title must not leave a new author behind.
        let existing = self
            .book_repository
            .select_by_title(title)
            .await
            .context("find book by title", title)?;
        if let Some(existing) = existing {
            return Err(title_taken(title).with_book_id(&existing.id).into());
        }

        let author = self.find_or_create_author.execute(input.author_name).await?;

        let id = BookId::new(self.id_generator.lock().await.generate_async().await);
        let record = match self
            .book_repository
            .insert(BookRecordInsert {
                id,
                create_time: UtcDateTime::now(),
                title: title.to_string(),
                synopsis: input.synopsis.map(ToString::to_string),
                author_id: author.author.id,
            })
            .await
        {
            Ok(record) => record,
            Err(err) if err.is_unique_violation(BOOK_TITLE_INDEX) => {
                return Err(title_taken(title).into());
            }
            Err(err) => return Err(AppError::store("create book", title, err)),
        };

        info!(
            book_id = %id,
            author_id = %author.author.id,
            "Successfully created book"
        );

        let mut book = Book::from(record);
        book.author = author.author.into();

        Ok(CreateBookCommandOutput {
            book,
            author_created: author.created,
        })
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_api::model::error::ErrorKind;

    use super::*;
    use crate::author::repository::{AuthorRepositoryArc, memory::MemoryAuthorRepository};
    use crate::book::repository::memory::MemoryBookRepository;

    fn command(author_repository: AuthorRepositoryArc) -> CreateBookCommand {
        let id_generator = Arc::new(Mutex::new(WorkerIdGenerator::new(1)));
        CreateBookCommand::new(
            id_generator.clone(),
            Arc::new(MemoryBookRepository::new()),
            FindOrCreateAuthorCommand::new(id_generator, author_repository),
        )
    }

    #[tokio::test]
    async fn create_with_new_author() {
        let author_repository: AuthorRepositoryArc = Arc::new(MemoryAuthorRepository::new());
        let command = command(author_repository.clone());

        let output = command
            .execute(CreateBookCommandInput {
                title: " Dune ",
                author_name: "Frank Herbert",
                synopsis: Some("Spice."),
            })
            .await
            .unwrap();

        assert!(output.author_created);
        assert_eq!(output.book.title, "Dune");
        assert_eq!(output.book.synopsis.as_deref(), Some("Spice."));
        let author = output.book.author.resolved().unwrap();
        assert_eq!(author.name, "Frank Herbert");
        assert_eq!(author_repository.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn taken_title_creates_no_author() {
        let author_repository: AuthorRepositoryArc = Arc::new(MemoryAuthorRepository::new());
        let command = command(author_repository.clone());
        command
            .execute(CreateBookCommandInput {
                title: "Dune",
                author_name: "Frank Herbert",
                synopsis: None,
            })
            .await
            .unwrap();

        let err = command
            .execute(CreateBookCommandInput {
                title: "Dune",
                author_name: "Somebody Else",
                synopsis: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(author_repository.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_title_rejected() {
        let err = command(Arc::new(MemoryAuthorRepository::new()))
            .execute(CreateBookCommandInput {
                title: "  ",
                author_name: "Frank Herbert",
                synopsis: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
