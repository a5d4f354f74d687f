//! Bookshelf service
//!
//! Resolves the Author/Book relationship over an entity store and executes
//! graph-style work items against it.
//!
//! ## Features
//!
//! - Lazy relationship resolution that reuses already materialized data
//! - Find-or-create of authors by case-insensitive name on book writes
//! - Cascading author deletion
//! - Storage-level uniqueness for author names and book titles
//! - Structured logging and tracing

pub mod author;
pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod store;
pub mod telemetry;
pub mod validation;
