use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use bookshelf_api::model::{author::AuthorId, book::BookId};
use itertools::Itertools;
use tokio::sync::RwLock;

use crate::{
    book::repository::{
        BOOK_TITLE_INDEX, BookRecordInsert, BookRecordOwned, BookRecordUpdate, BookRepository,
    },
    store::error::{StoreError, StoreResult},
};

/// In-memory implementation of the book repository.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    table: Arc<RwLock<BookTable>>,
    closed: AtomicBool,
}

#[derive(Debug, Default)]
struct BookTable {
    books: HashMap<BookId, BookRecordOwned>,
    title_index: HashMap<String, BookId>,
}

impl MemoryBookRepository {
    /// Creates a new empty memory book repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new memory book repository with initial data.
    pub fn with_data(books: Vec<BookRecordOwned>) -> Self {
        let mut table = BookTable::default();
        for book in books {
            table.title_index.insert(book.title.clone(), book.id);
            table.books.insert(book.id, book);
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

impl BookTable {
    fn check_title(&self, title: &str, owner: Option<&BookId>) -> StoreResult<()> {
        match self.title_index.get(title) {
            Some(id) if Some(id) != owner => Err(StoreError::UniqueViolation {
                index: BOOK_TITLE_INDEX,
                value: title.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn sorted<'a, I>(books: I) -> Vec<BookRecordOwned>
    where
        I: Iterator<Item = &'a BookRecordOwned>,
    {
        books
            .sorted_unstable_by_key(|book| (book.create_time, book.id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn insert(&self, record: BookRecordInsert) -> StoreResult<BookRecordOwned> {
        self.ensure_open()?;
        let mut books = self.table.write().await;

        books.check_title(&record.title, None)?;
        let book = BookRecordOwned {
            id: record.id,
            create_time: record.create_time,
            update_time: None,
            title: record.title,
            synopsis: record.synopsis,
            author_id: record.author_id,
        };
        books.title_index.insert(book.title.clone(), book.id);
        books.books.insert(book.id, book.clone());

        Ok(book)
    }

    async fn update(&self, update: BookRecordUpdate<'_>) -> StoreResult<Option<BookRecordOwned>> {
        self.ensure_open()?;
        let mut books = self.table.write().await;

        let Some(old_title) = books.books.get(update.id).map(|book| book.title.clone()) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            books.check_title(title, Some(update.id))?;
            books.title_index.remove(&old_title);
            books.title_index.insert(title.to_string(), *update.id);
        }

        let Some(book) = books.books.get_mut(update.id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            book.title = title.to_string();
        }
        if let Some(synopsis) = update.synopsis {
            book.synopsis = Some(synopsis.to_string());
        }
        if let Some(author_id) = update.author_id {
            book.author_id = author_id;
        }
        book.update_time = Some(update.update_time);

        Ok(Some(book.clone()))
    }

    async fn select(&self, id: &BookId) -> StoreResult<Option<BookRecordOwned>> {
        self.ensure_open()?;
        let books = self.table.read().await;
        Ok(books.books.get(id).cloned())
    }

    async fn select_all(&self) -> StoreResult<Vec<BookRecordOwned>> {
        self.ensure_open()?;
        let books = self.table.read().await;
        Ok(BookTable::sorted(books.books.values()))
    }

    async fn select_by_title(&self, title: &str) -> StoreResult<Option<BookRecordOwned>> {
        self.ensure_open()?;
        let books = self.table.read().await;
        Ok(books
            .title_index
            .get(title)
            .and_then(|id| books.books.get(id))
            .cloned())
    }

    async fn select_by_author(&self, author_id: &AuthorId) -> StoreResult<Vec<BookRecordOwned>> {
        self.ensure_open()?;
        let books = self.table.read().await;
        Ok(BookTable::sorted(
            books
                .books
                .values()
                .filter(|book| book.author_id == *author_id),
        ))
    }

    async fn delete(&self, id: &BookId) -> StoreResult<Option<BookRecordOwned>> {
        self.ensure_open()?;
        let mut books = self.table.write().await;

        let removed = books.books.remove(id);
        if let Some(book) = &removed {
            books.title_index.remove(&book.title);
        }
        Ok(removed)
    }

    async fn delete_by_author(&self, author_id: &AuthorId) -> StoreResult<usize> {
        self.ensure_open()?;
        let mut books = self.table.write().await;

        let ids: Vec<BookId> = books
            .books
            .values()
            .filter(|book| book.author_id == *author_id)
            .map(|book| book.id)
            .collect();
        for id in &ids {
            if let Some(book) = books.books.remove(id) {
                books.title_index.remove(&book.title);
            }
        }
        Ok(ids.len())
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
