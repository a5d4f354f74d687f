use std::sync::Arc;

use bookshelf_api::model::{
    author_service::{AddAuthorInput, UpdateAuthorInput},
    book_service::{AddBookInput, UpdateBookInput},
    error::ErrorKind,
};
use bookshelf_common::id::worker::WorkerIdGenerator;
use bookshelf_service::{
    config::{DatabaseConfig, MemoryDatabaseConfig},
    engine::Bookshelf,
    graph::{executor::Executor, operation::WorkItem, response::Response},
    store::Store,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

fn bookshelf(store: &Store) -> Bookshelf {
    Bookshelf::new(store, Arc::new(Mutex::new(WorkerIdGenerator::new(7))))
}

fn add_book(title: &str, author_name: &str) -> AddBookInput {
    AddBookInput {
        title: title.into(),
        author_name: author_name.into(),
        synopsis: None,
    }
}

fn add_author(name: &str) -> AddAuthorInput {
    AddAuthorInput {
        name: name.into(),
        bio: None,
    }
}

#[tokio::test]
async fn add_book_links_existing_author_ignoring_case() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    let author = bookshelf
        .mutation
        .add_author(&add_author("Ursula K. Le Guin"))
        .await
        .unwrap();
    let book = bookshelf
        .mutation
        .add_book(&add_book("The Dispossessed", "ursula k. LE GUIN"))
        .await
        .unwrap();

    let linked = book.author.resolved().unwrap();
    assert_eq!(linked.id, author.id);
    assert_eq!(linked.name, "Ursula K. Le Guin");
    assert_eq!(bookshelf.query.authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_book_creates_exactly_one_author() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    bookshelf
        .mutation
        .add_book(&add_book("Dune", "Frank Herbert"))
        .await
        .unwrap();
    bookshelf
        .mutation
        .add_book(&add_book("Dune Messiah", "Frank Herbert"))
        .await
        .unwrap();

    let authors = bookshelf.query.authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Frank Herbert");
    assert!(authors[0].bio.is_none());
}

#[tokio::test]
async fn add_author_conflicts_ignoring_case() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    bookshelf.mutation.add_author(&add_author("Jane")).await.unwrap();
    let err = bookshelf
        .mutation
        .add_author(&add_author("jane"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(bookshelf.query.authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_author_cascades() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    let orwell = bookshelf
        .mutation
        .add_book(&add_book("1984", "George Orwell"))
        .await
        .unwrap()
        .author_id();
    bookshelf
        .mutation
        .add_book(&add_book("Animal Farm", "George Orwell"))
        .await
        .unwrap();
    let emma = bookshelf
        .mutation
        .add_book(&add_book("Emma", "Jane Austen"))
        .await
        .unwrap();

    assert!(
        bookshelf
            .mutation
            .delete_author(&orwell.to_string())
            .await
            .unwrap()
    );

    let books = bookshelf.query.books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, emma.id);
    assert!(books.iter().all(|book| book.author_id() != orwell));
    assert!(
        bookshelf
            .query
            .author(&orwell.to_name())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn delete_missing_author_changes_nothing() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);
    let book = bookshelf
        .mutation
        .add_book(&add_book("Emma", "Jane Austen"))
        .await
        .unwrap();

    let missing = bookshelf_api::model::author::AuthorId::new(bookshelf_common::id::Id::generate());
    assert!(
        !bookshelf
            .mutation
            .delete_author(&missing.to_string())
            .await
            .unwrap()
    );
    assert!(!bookshelf.mutation.delete_author("not an id").await.unwrap());

    assert_eq!(bookshelf.query.authors().await.unwrap().len(), 1);
    assert_eq!(bookshelf.query.books().await.unwrap()[0].id, book.id);
}

#[tokio::test]
async fn get_book_resolves_author() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    let created = bookshelf
        .mutation
        .add_book(&add_book("Dune", "Frank Herbert"))
        .await
        .unwrap();
    let book = bookshelf
        .query
        .book(&created.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(book.author.resolved().is_none());

    let author = bookshelf
        .resolver
        .resolve_author_of(&book)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author.name, "Frank Herbert");
}

#[tokio::test]
async fn update_book_repoints_author_only() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    let created = bookshelf
        .mutation
        .add_book(&AddBookInput {
            synopsis: Some("A desert planet.".into()),
            ..add_book("Dune", "Frank Herbert")
        })
        .await
        .unwrap();

    let updated = bookshelf
        .mutation
        .update_book(
            &created.id.to_name(),
            &UpdateBookInput {
                author_name: Some("Brian Herbert".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Dune");
    assert_eq!(updated.synopsis.as_deref(), Some("A desert planet."));
    assert_ne!(updated.author_id(), created.author_id());
    assert_eq!(updated.author.resolved().unwrap().name, "Brian Herbert");

    // The previous author keeps existing without books.
    let previous = bookshelf
        .query
        .author(&created.author_id().to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(
        bookshelf
            .resolver
            .resolve_books_of(&previous)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn updates_of_missing_entities() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    assert!(
        bookshelf
            .mutation
            .update_book("books/nope", &UpdateBookInput::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        bookshelf
            .mutation
            .update_author(
                "01ARZ3NDEKTSV4RRFFQ69G5FAV",
                &UpdateAuthorInput {
                    bio: Some("Nobody".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .is_none()
    );
    assert!(!bookshelf.mutation.delete_book("").await.unwrap());
}

#[tokio::test]
async fn delete_book_keeps_author() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    let book = bookshelf
        .mutation
        .add_book(&add_book("Emma", "Jane Austen"))
        .await
        .unwrap();

    assert!(
        bookshelf
            .mutation
            .delete_book(&book.id.to_name())
            .await
            .unwrap()
    );
    assert!(bookshelf.query.books().await.unwrap().is_empty());

    let author = bookshelf
        .query
        .author(&book.author_id().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author.name, "Jane Austen");

    let again = bookshelf
        .mutation
        .add_book(&add_book("Emma", "Jane Austen"))
        .await
        .unwrap();
    assert_eq!(again.author_id(), author.id);
    assert!(
        !bookshelf
            .mutation
            .delete_book(&book.id.to_string())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn duplicate_title_conflicts() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);

    bookshelf
        .mutation
        .add_book(&add_book("Emma", "Jane Austen"))
        .await
        .unwrap();
    let err = bookshelf
        .mutation
        .add_book(&add_book("Emma", "Someone Else"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(bookshelf.query.authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn closed_store_rejects_operations() {
    let store = Store::memory();
    let bookshelf = bookshelf(&store);
    store.close().await.unwrap();

    let err = bookshelf.query.books().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    let err = bookshelf
        .mutation
        .add_author(&add_author("Jane"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
}

async fn run(executor: &Executor, item: Value) -> Response {
    let item: WorkItem = serde_json::from_value(item).unwrap();
    executor.respond(&item).await
}

#[tokio::test]
async fn work_items_on_seeded_store() {
    let id_generator = Arc::new(Mutex::new(WorkerIdGenerator::new(7)));
    let store = Store::open(
        &DatabaseConfig::Memory(MemoryDatabaseConfig { seed: true }),
        &id_generator,
    )
    .await
    .unwrap();
    let executor = Executor::new(Bookshelf::new(&store, id_generator));

    let response = run(
        &executor,
        json!({
            "operation": {"field": "authors"},
            "selection": ["name", {"name": "books", "alias": "titles", "selection": ["title"]}]
        }),
    )
    .await;
    let authors = response.data().unwrap().as_array().unwrap().clone();
    assert_eq!(authors.len(), 5);
    let orwell = authors
        .iter()
        .find(|author| author["name"] == "George Orwell")
        .unwrap();
    let mut titles: Vec<_> = orwell["titles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, ["1984", "Animal Farm"]);

    let response = run(
        &executor,
        json!({
            "operation": {
                "field": "addBook",
                "arguments": {"input": {"title": "Emma", "authorName": "jane austen"}}
            },
            "selection": ["title", {"name": "author", "selection": ["name", "__typename"]}]
        }),
    )
    .await;
    assert_eq!(
        response,
        Response::Data(json!({
            "title": "Emma",
            "author": {"name": "Jane Austen", "__typename": "Author"}
        }))
    );

    let response = run(
        &executor,
        json!({
            "operation": {"field": "addAuthor", "arguments": {"input": {"name": "AGATHA christie"}}},
            "selection": ["id"]
        }),
    )
    .await;
    assert!(matches!(
        response,
        Response::Error {
            kind: ErrorKind::Conflict,
            ..
        }
    ));

    store.close().await.unwrap();
}

#[tokio::test]
async fn listing_without_relationships_renders_scalars() {
    let store = Store::memory();
    let executor = Executor::new(bookshelf(&store));

    executor
        .bookshelf()
        .mutation
        .add_book(&add_book("Dune", "Frank Herbert"))
        .await
        .unwrap();

    let response = run(&executor, json!({"operation": {"field": "books"}})).await;
    let books = response.data().unwrap().as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
    assert!(books[0]["createdAt"].is_string());
    assert!(books[0].get("author").is_none());
}
