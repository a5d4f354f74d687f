use bookshelf_api::model::{author::AuthorId, book::BookId};
use bookshelf_common::{date_time::UtcDateTime, id::worker::WorkerIdGenerator};

use crate::{author::repository::AuthorRecordOwned, book::repository::BookRecordOwned};

const AUTHORS: &[&str] = &[
    "J.K. Rowling",
    "Stephen King",
    "Agatha Christie",
    "George Orwell",
    "Jane Austen",
];

/// Title and index into [`AUTHORS`].
const BOOKS: &[(&str, usize)] = &[
    ("Harry Potter and the Sorcerer's Stone", 0),
    ("Harry Potter and the Chamber of Secrets", 0),
    ("It", 1),
    ("The Shining", 1),
    ("And Then There Were None", 2),
    ("Murder on the Orient Express", 2),
    ("1984", 3),
    ("Animal Farm", 3),
    ("Pride and Prejudice", 4),
];

#[derive(Debug, Clone)]
pub struct Catalogue {
    pub authors: Vec<AuthorRecordOwned>,
    pub books: Vec<BookRecordOwned>,
}

/// Builds the sample catalogue with freshly generated identifiers.
pub fn catalogue(id_generator: &mut WorkerIdGenerator) -> Catalogue {
    let create_time = UtcDateTime::now();

    let authors: Vec<_> = AUTHORS
        .iter()
        .map(|name| AuthorRecordOwned {
            id: AuthorId::new(id_generator.generate()),
            create_time,
            update_time: None,
            name: (*name).to_string(),
            bio: None,
        })
        .collect();

    let books = BOOKS
        .iter()
        .map(|(title, author)| BookRecordOwned {
            id: BookId::new(id_generator.generate()),
            create_time,
            update_time: None,
            title: (*title).to_string(),
            synopsis: None,
            author_id: authors[*author].id,
        })
        .collect();

    Catalogue { authors, books }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_book_has_an_author() {
        let catalogue = catalogue(&mut WorkerIdGenerator::new(3));
        assert_eq!(catalogue.authors.len(), AUTHORS.len());
        for book in &catalogue.books {
            assert!(
                catalogue
                    .authors
                    .iter()
                    .any(|author| author.id == book.author_id)
            );
        }
    }
}
