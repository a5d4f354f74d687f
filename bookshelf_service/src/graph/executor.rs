use std::{future::Future, pin::Pin};

use bookshelf_api::model::{author::Author, book::Book};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::{
    engine::Bookshelf,
    error::{AppError, AppResult},
    graph::{
        operation::{Operation, WorkItem},
        response::Response,
        selection::Selection,
    },
};

type RenderFuture<'a> = Pin<Box<dyn Future<Output = AppResult<Value>> + Send + 'a>>;

const BOOK_TYPE: &str = "Book";
const AUTHOR_TYPE: &str = "Author";
const TYPENAME_FIELD: &str = "__typename";

const BOOK_SCALARS: &[&str] = &["id", "title", "synopsis", "createdAt", "updatedAt"];
const AUTHOR_SCALARS: &[&str] = &["id", "name", "bio", "createdAt", "updatedAt"];

/// Runs work items and renders their results.
#[derive(Debug, Clone)]
pub struct Executor {
    bookshelf: Bookshelf,
}

impl Executor {
    pub fn new(bookshelf: Bookshelf) -> Self {
        Self { bookshelf }
    }

    pub fn bookshelf(&self) -> &Bookshelf {
        &self.bookshelf
    }

    /// Executes a work item and renders the root field's value.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a validation error when the
    /// selection names an unknown field.
    #[tracing::instrument(skip(self, item), fields(operation = item.operation.name()))]
    pub async fn execute(&self, item: &WorkItem) -> AppResult<Value> {
        let query = &self.bookshelf.query;
        let mutation = &self.bookshelf.mutation;
        let selection = &item.selection;
        check_selection(&item.operation, selection)?;

        let value = match &item.operation {
            Operation::Books => {
                let books = query.books().await?;
                let mut values = Vec::with_capacity(books.len());
                for book in &books {
                    values.push(self.render_book(book, selection).await?);
                }
                Value::Array(values)
            }
            Operation::Book { id } => match query.book(id).await? {
                Some(book) => self.render_book(&book, selection).await?,
                None => Value::Null,
            },
            Operation::Authors => {
                let authors = query.authors().await?;
                let mut values = Vec::with_capacity(authors.len());
                for author in &authors {
                    values.push(self.render_author(author, selection).await?);
                }
                Value::Array(values)
            }
            Operation::Author { id } => match query.author(id).await? {
                Some(author) => self.render_author(&author, selection).await?,
                None => Value::Null,
            },
            Operation::AddAuthor { input } => {
                let author = mutation.add_author(input).await?;
                self.render_author(&author, selection).await?
            }
            Operation::AddBook { input } => {
                let book = mutation.add_book(input).await?;
                self.render_book(&book, selection).await?
            }
            Operation::UpdateAuthor { id, input } => {
                match mutation.update_author(id, input).await? {
                    Some(author) => self.render_author(&author, selection).await?,
                    None => Value::Null,
                }
            }
            Operation::DeleteAuthor { id } => Value::Bool(mutation.delete_author(id).await?),
            Operation::UpdateBook { id, input } => match mutation.update_book(id, input).await? {
                Some(book) => self.render_book(&book, selection).await?,
                None => Value::Null,
            },
            Operation::DeleteBook { id } => Value::Bool(mutation.delete_book(id).await?),
        };

        Ok(value)
    }

    /// Executes a work item and wraps the outcome for the caller.
    pub async fn respond(&self, item: &WorkItem) -> Response {
        match self.execute(item).await {
            Ok(value) => Response::Data(value),
            Err(err) if item.operation.is_mutation() => {
                warn!(operation = item.operation.name(), kind = ?err.kind(), "Mutation failed");
                err.into()
            }
            Err(err) => {
                info!(operation = item.operation.name(), kind = ?err.kind(), "Query failed");
                err.into()
            }
        }
    }

    fn render_book<'a>(&'a self, book: &'a Book, selection: &'a Selection) -> RenderFuture<'a> {
        Box::pin(async move {
            let mut object = Map::new();
            if selection.is_empty() {
                for name in BOOK_SCALARS {
                    object.insert((*name).to_string(), book_scalar(book, name)?);
                }
                return Ok(Value::Object(object));
            }

            for field in selection {
                let value = if field.name == "author" {
                    match self.bookshelf.resolver.resolve_author_of(book).await? {
                        Some(author) => self.render_author(&author, &field.selection).await?,
                        None => Value::Null,
                    }
                } else {
                    book_scalar(book, &field.name)?
                };
                object.insert(field.response_key().to_string(), value);
            }
            Ok(Value::Object(object))
        })
    }

    fn render_author<'a>(
        &'a self,
        author: &'a Author,
        selection: &'a Selection,
    ) -> RenderFuture<'a> {
        Box::pin(async move {
            let mut object = Map::new();
            if selection.is_empty() {
                for name in AUTHOR_SCALARS {
                    object.insert((*name).to_string(), author_scalar(author, name)?);
                }
                return Ok(Value::Object(object));
            }

            for field in selection {
                let value = if field.name == "books" {
                    let books = self.bookshelf.resolver.resolve_books_of(author).await?;
                    let mut values = Vec::with_capacity(books.len());
                    for book in &books {
                        values.push(self.render_book(book, &field.selection).await?);
                    }
                    Value::Array(values)
                } else {
                    author_scalar(author, &field.name)?
                };
                object.insert(field.response_key().to_string(), value);
            }
            Ok(Value::Object(object))
        })
    }
}

/// Rejects unknown fields anywhere in the selection, before any store access.
fn check_selection(operation: &Operation, selection: &Selection) -> AppResult<()> {
    match operation {
        Operation::Books
        | Operation::Book { .. }
        | Operation::AddBook { .. }
        | Operation::UpdateBook { .. } => check_book_selection(selection),
        Operation::Authors
        | Operation::Author { .. }
        | Operation::AddAuthor { .. }
        | Operation::UpdateAuthor { .. } => check_author_selection(selection),
        Operation::DeleteAuthor { .. } | Operation::DeleteBook { .. } => Ok(()),
    }
}

fn check_book_selection(selection: &Selection) -> AppResult<()> {
    for field in selection {
        match field.name.as_str() {
            "author" => check_author_selection(&field.selection)?,
            name if name == TYPENAME_FIELD || BOOK_SCALARS.contains(&name) => {}
            name => return Err(unknown_field(BOOK_TYPE, name)),
        }
    }
    Ok(())
}

fn check_author_selection(selection: &Selection) -> AppResult<()> {
    for field in selection {
        match field.name.as_str() {
            "books" => check_book_selection(&field.selection)?,
            name if name == TYPENAME_FIELD || AUTHOR_SCALARS.contains(&name) => {}
            name => return Err(unknown_field(AUTHOR_TYPE, name)),
        }
    }
    Ok(())
}

fn unknown_field(type_name: &'static str, field: &str) -> AppError {
    AppError::UnknownField {
        type_name,
        field: field.to_string(),
    }
}

fn book_scalar(book: &Book, name: &str) -> AppResult<Value> {
    Ok(match name {
        "id" => json!(book.id),
        "title" => json!(book.title),
        "synopsis" => json!(book.synopsis),
        "createdAt" => json!(book.create_time),
        "updatedAt" => json!(book.update_time),
        TYPENAME_FIELD => json!(BOOK_TYPE),
        _ => return Err(unknown_field(BOOK_TYPE, name)),
    })
}

fn author_scalar(author: &Author, name: &str) -> AppResult<Value> {
    Ok(match name {
        "id" => json!(author.id),
        "name" => json!(author.name),
        "bio" => json!(author.bio),
        "createdAt" => json!(author.create_time),
        "updatedAt" => json!(author.update_time),
        TYPENAME_FIELD => json!(AUTHOR_TYPE),
        _ => return Err(unknown_field(AUTHOR_TYPE, name)),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bookshelf_api::model::{author_service::AddAuthorInput, error::ErrorKind};
    use bookshelf_common::id::{Id, worker::WorkerIdGenerator};
    use tokio::sync::Mutex;

    use super::*;
    use crate::{graph::selection::Field, store::Store};

    fn executor() -> Executor {
        let id_generator = Arc::new(Mutex::new(WorkerIdGenerator::new(1)));
        Executor::new(Bookshelf::new(&Store::memory(), id_generator))
    }

    #[tokio::test]
    async fn empty_selection_renders_scalars() {
        let executor = executor();
        let value = executor
            .execute(&WorkItem::new(
                Operation::AddAuthor {
                    input: AddAuthorInput {
                        name: "Frank Herbert".into(),
                        bio: None,
                    },
                },
                Selection::default(),
            ))
            .await
            .unwrap();

        let object = value.as_object().unwrap();
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), AUTHOR_SCALARS.len());
        assert_eq!(object["name"], "Frank Herbert");
        assert_eq!(object["bio"], Value::Null);
        assert_eq!(object["updatedAt"], Value::Null);
        assert!(!object.contains_key("books"));
    }

    fn is_validation_error(response: &Response) -> bool {
        matches!(
            response,
            Response::Error {
                kind: ErrorKind::Validation,
                ..
            }
        )
    }

    #[tokio::test]
    async fn unknown_field() {
        let executor = executor();
        let response = executor
            .respond(&WorkItem::new(
                Operation::Books,
                Selection::from_iter([Field::new("isbn")]),
            ))
            .await;
        assert!(is_validation_error(&response));

        let response = executor
            .respond(&WorkItem::new(
                Operation::Book {
                    id: Id::generate().to_string(),
                },
                Selection::from_iter([Field::new("isbn")]),
            ))
            .await;
        assert!(is_validation_error(&response));

        let response = executor
            .respond(&WorkItem::new(
                Operation::Authors,
                Selection::from_iter([Field::new("books").with_selection(
                    Selection::from_iter([Field::new("author").with_selection(
                        Selection::from_iter([Field::new("email")]),
                    )]),
                )]),
            ))
            .await;
        assert!(is_validation_error(&response));

        let response = executor
            .respond(&WorkItem::new(
                Operation::AddAuthor {
                    input: AddAuthorInput {
                        name: "Frank Herbert".into(),
                        bio: None,
                    },
                },
                Selection::from_iter([Field::new("isbn")]),
            ))
            .await;
        assert!(is_validation_error(&response));
        // The selection is rejected before the author is created.
        assert!(executor.bookshelf().query.authors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn nested_known_fields_accepted() {
        let executor = executor();
        let response = executor
            .respond(&WorkItem::new(
                Operation::Books,
                Selection::from_iter([
                    Field::new("title"),
                    Field::new("author").with_selection(Selection::from_iter([
                        Field::new("name"),
                        Field::new("books").with_selection(Selection::from_iter([Field::new(
                            TYPENAME_FIELD,
                        )])),
                    ])),
                ]),
            ))
            .await;
        assert_eq!(response, Response::Data(json!([])));
    }

    #[tokio::test]
    async fn alias_and_typename() {
        let executor = executor();
        let value = executor
            .execute(&WorkItem::new(
                Operation::AddAuthor {
                    input: AddAuthorInput {
                        name: "Frank Herbert".into(),
                        bio: None,
                    },
                },
                Selection::from_iter([
                    Field::new("name").with_alias("fullName"),
                    Field::new(TYPENAME_FIELD),
                ]),
            ))
            .await
            .unwrap();
        assert_eq!(value, json!({"fullName": "Frank Herbert", "__typename": "Author"}));
    }
}
