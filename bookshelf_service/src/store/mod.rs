//! Entity store adapter.
//!
//! A [`Store`] bundles the author and book repositories behind one explicit
//! lifecycle: open it once from configuration, clone it into every component
//! that needs it, and [`Store::close`] it on shutdown.

use std::sync::Arc;

use bookshelf_common::id::worker::WorkerIdGenerator;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    author::repository::{AuthorRepositoryArc, memory::MemoryAuthorRepository},
    book::repository::{BookRepositoryArc, memory::MemoryBookRepository},
    config::DatabaseConfig,
    error::{AppResult, StoreContext},
};

/// Store error types.
pub mod error;

/// Sample catalogue for seeding a memory store.
pub mod seed;

#[derive(Debug, Clone)]
pub struct Store {
    author_repository: AuthorRepositoryArc,
    book_repository: BookRepositoryArc,
}

impl Store {
    pub fn new(author_repository: AuthorRepositoryArc, book_repository: BookRepositoryArc) -> Self {
        Self {
            author_repository,
            book_repository,
        }
    }

    /// Creates an empty in-memory store.
    pub fn memory() -> Self {
        Self::new(
            Arc::new(MemoryAuthorRepository::new()),
            Arc::new(MemoryBookRepository::new()),
        )
    }

    /// Opens the store described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened.
    pub async fn open(
        config: &DatabaseConfig,
        id_generator: &Arc<Mutex<WorkerIdGenerator>>,
    ) -> AppResult<Self> {
        match config {
            DatabaseConfig::Memory(memory) if memory.seed => {
                let catalogue = seed::catalogue(&mut *id_generator.lock().await);
                info!(
                    authors = catalogue.authors.len(),
                    books = catalogue.books.len(),
                    "Opening seeded memory store"
                );
                Ok(Self::new(
                    Arc::new(MemoryAuthorRepository::with_data(catalogue.authors)),
                    Arc::new(MemoryBookRepository::with_data(catalogue.books)),
                ))
            }
            DatabaseConfig::Memory(_) => {
                info!("Opening empty memory store");
                Ok(Self::memory())
            }
        }
    }

    pub fn author_repository(&self) -> &AuthorRepositoryArc {
        &self.author_repository
    }

    pub fn book_repository(&self) -> &BookRepositoryArc {
        &self.book_repository
    }

    /// Shuts both repositories down.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository fails to close.
    pub async fn close(&self) -> AppResult<()> {
        self.author_repository
            .close()
            .await
            .context("close store", "authors")?;
        self.book_repository
            .close()
            .await
            .context("close store", "books")?;
        info!("Store closed");
        Ok(())
    }
}
