//! Author management module.
//!
//! Provides the author side of the catalogue:
//! - Command handlers for create, find-or-create, update, and delete
//! - Query manager for retrieving authors
//! - Repository abstraction for data persistence

use bookshelf_api::model::error::{AuthorError, AuthorErrorReason};

/// Strict author creation command handler.
pub mod create_author_command;

/// Author deletion command handler, cascading to books.
pub mod delete_author_command;

/// Author lookup-or-creation used by book mutations.
pub mod find_or_create_author_command;

/// Author query manager for data retrieval.
pub mod query_manager;

/// Author repository abstraction and implementations.
pub mod repository;

/// Author update command handler.
pub mod update_author_command;

fn name_taken(name: &str) -> AuthorError {
    AuthorError::new_with_message(
        AuthorErrorReason::NameAlreadyExists,
        format!("an author named `{name}` already exists"),
    )
    .with_name(name)
}
