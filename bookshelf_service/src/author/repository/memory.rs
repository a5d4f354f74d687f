use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use bookshelf_api::model::author::{Author, AuthorId};
use itertools::Itertools;
use tokio::sync::RwLock;

use crate::{
    author::repository::{
        AUTHOR_NAME_INDEX, AuthorRecordInsert, AuthorRecordOwned, AuthorRecordUpdate,
        AuthorRepository,
    },
    store::error::{StoreError, StoreResult},
};

/// In-memory implementation of the author repository.
///
/// Name uniqueness is enforced under the same write lock as the insert, so two
/// concurrent inserts of the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryAuthorRepository {
    table: Arc<RwLock<AuthorTable>>,
    closed: AtomicBool,
}

#[derive(Debug, Default)]
struct AuthorTable {
    authors: HashMap<AuthorId, AuthorRecordOwned>,
    name_index: HashMap<String, AuthorId>,
}

impl MemoryAuthorRepository {
    /// Creates a new empty memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new memory repository with initial data.
    ///
    /// Later records win when two share a name.
    pub fn with_data(authors: Vec<AuthorRecordOwned>) -> Self {
        let mut table = AuthorTable::default();
        for author in authors {
            table
                .name_index
                .insert(Author::name_key(&author.name), author.id);
            table.authors.insert(author.id, author);
        }
        Self {
            table: Arc::new(RwLock::new(table)),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl AuthorTable {
    fn check_name(&self, name: &str, owner: Option<&AuthorId>) -> StoreResult<String> {
        let key = Author::name_key(name);
        match self.name_index.get(&key) {
            Some(id) if Some(id) != owner => Err(StoreError::UniqueViolation {
                index: AUTHOR_NAME_INDEX,
                value: name.to_string(),
            }),
            _ => Ok(key),
        }
    }
}

#[async_trait]
impl AuthorRepository for MemoryAuthorRepository {
    async fn insert(&self, record: AuthorRecordInsert) -> StoreResult<AuthorRecordOwned> {
        self.ensure_open()?;
        let mut table = self.table.write().await;

        let key = table.check_name(&record.name, None)?;
        let author = AuthorRecordOwned {
            id: record.id,
            create_time: record.create_time,
            update_time: None,
            name: record.name,
            bio: record.bio,
        };
        table.name_index.insert(key, author.id);
        table.authors.insert(author.id, author.clone());

        Ok(author)
    }

    async fn update(
        &self,
        update: AuthorRecordUpdate<'_>,
    ) -> StoreResult<Option<AuthorRecordOwned>> {
        self.ensure_open()?;
        let mut table = self.table.write().await;

        let Some(current) = table.authors.get(update.id) else {
            return Ok(None);
        };
        let old_key = Author::name_key(&current.name);

        if let Some(name) = update.name {
            let key = table.check_name(name, Some(update.id))?;
            table.name_index.remove(&old_key);
            table.name_index.insert(key, *update.id);
        }

        let Some(author) = table.authors.get_mut(update.id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            author.name = name.to_string();
        }
        if let Some(bio) = update.bio {
            author.bio = Some(bio.to_string());
        }
        author.update_time = Some(update.update_time);

        Ok(Some(author.clone()))
    }

    async fn select(&self, id: &AuthorId) -> StoreResult<Option<AuthorRecordOwned>> {
        self.ensure_open()?;
        let table = self.table.read().await;
        Ok(table.authors.get(id).cloned())
    }

    async fn select_all(&self) -> StoreResult<Vec<AuthorRecordOwned>> {
        self.ensure_open()?;
        let table = self.table.read().await;
        Ok(table
            .authors
            .values()
            .sorted_unstable_by_key(|author| (author.create_time, author.id))
            .cloned()
            .collect())
    }

    async fn select_by_name(&self, name: &str) -> StoreResult<Option<AuthorRecordOwned>> {
        self.ensure_open()?;
        let table = self.table.read().await;
        Ok(table
            .name_index
            .get(&Author::name_key(name))
            .and_then(|id| table.authors.get(id))
            .cloned())
    }

    async fn delete(&self, id: &AuthorId) -> StoreResult<Option<AuthorRecordOwned>> {
        self.ensure_open()?;
        let mut table = self.table.write().await;

        let removed = table.authors.remove(id);
        if let Some(author) = &removed {
            table.name_index.remove(&Author::name_key(&author.name));
        }
        Ok(removed)
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
