//! Model definitions for the bookshelf service.

/// Author entity and identifier.
pub mod author;
/// Author operation inputs.
pub mod author_service;
/// Book entity and identifier.
pub mod book;
/// Book operation inputs.
pub mod book_service;
/// Domain errors for the bookshelf service.
pub mod error;
