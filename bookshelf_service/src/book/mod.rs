//! Book management module.
//!
//! Provides the book side of the catalogue:
//! - Command handlers for create, update, and delete operations
//! - Query manager for retrieving books
//! - Repository abstraction for data persistence

use bookshelf_api::model::error::{BookError, BookErrorReason};

/// Book creation command handler.
pub mod create_book_command;

/// Book deletion command handler.
pub mod delete_book_command;

/// Book query manager for data retrieval.
pub mod query_manager;

/// Book repository abstraction and implementations.
pub mod repository;

/// Book update command handler.
pub mod update_book_command;

fn title_taken(title: &str) -> BookError {
    BookError::new_with_message(
        BookErrorReason::TitleAlreadyExists,
        format!("a book titled `{title}` already exists"),
    )
    .with_title(title)
}
