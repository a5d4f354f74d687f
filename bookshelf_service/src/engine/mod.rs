//! Query and mutation entry points over a [`Store`].

use std::sync::Arc;

use bookshelf_common::id::worker::WorkerIdGenerator;
use tokio::sync::Mutex;

use crate::{
    author::{
        create_author_command::CreateAuthorCommand, delete_author_command::DeleteAuthorCommand,
        find_or_create_author_command::FindOrCreateAuthorCommand,
        query_manager::AuthorQueryManager, update_author_command::UpdateAuthorCommand,
    },
    book::{
        create_book_command::CreateBookCommand, delete_book_command::DeleteBookCommand,
        query_manager::BookQueryManager, update_book_command::UpdateBookCommand,
    },
    resolver::RelationshipResolver,
    store::Store,
};

/// Mutation engine.
pub mod mutation;

/// Query engine.
pub mod query;

use mutation::MutationEngine;
use query::QueryEngine;

/// Every operation on the catalogue, wired to one store.
#[derive(Debug, Clone)]
pub struct Bookshelf {
    pub query: QueryEngine,
    pub mutation: MutationEngine,
    pub resolver: RelationshipResolver,
}

impl Bookshelf {
    pub fn new(store: &Store, id_generator: Arc<Mutex<WorkerIdGenerator>>) -> Self {
        let author_repository = store.author_repository();
        let book_repository = store.book_repository();

        let resolver =
            RelationshipResolver::new(Arc::clone(author_repository), Arc::clone(book_repository));
        let find_or_create_author =
            FindOrCreateAuthorCommand::new(Arc::clone(&id_generator), Arc::clone(author_repository));

        let query = QueryEngine::new(
            AuthorQueryManager::new(Arc::clone(author_repository)),
            BookQueryManager::new(Arc::clone(book_repository)),
        );

        let mutation = MutationEngine::new(
            CreateAuthorCommand::new(Arc::clone(&id_generator), Arc::clone(author_repository)),
            UpdateAuthorCommand::new(Arc::clone(author_repository)),
            DeleteAuthorCommand::new(Arc::clone(author_repository), Arc::clone(book_repository)),
            CreateBookCommand::new(
                id_generator,
                Arc::clone(book_repository),
                find_or_create_author.clone(),
            ),
            UpdateBookCommand::new(
                Arc::clone(book_repository),
                find_or_create_author,
                resolver.clone(),
            ),
            DeleteBookCommand::new(Arc::clone(book_repository)),
        );

        Self {
            query,
            mutation,
            resolver,
        }
    }
}
