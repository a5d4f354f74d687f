use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use bookshelf_common::{
    date_time::UtcDateTime,
    id::{Id, ParseIdError},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::author::{Author, AuthorId};

/// A persisted book.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub synopsis: Option<String>,
    pub author: AuthorLink,
    pub create_time: UtcDateTime,
    pub update_time: Option<UtcDateTime>,
}

/// Relationship from a book to its owning author.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorLink {
    /// Only the author's identifier is known.
    Reference(AuthorId),
    /// The author was materialized together with the book.
    Resolved(Box<Author>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(pub Id);

impl Book {
    pub const NAME_PREFIX: &'static str = "books/";

    pub fn author_id(&self) -> AuthorId {
        self.author.id()
    }
}

impl AuthorLink {
    pub fn id(&self) -> AuthorId {
        match self {
            Self::Reference(id) => *id,
            Self::Resolved(author) => author.id,
        }
    }

    pub fn resolved(&self) -> Option<&Author> {
        match self {
            Self::Reference(_) => None,
            Self::Resolved(author) => Some(author),
        }
    }
}

impl From<AuthorId> for AuthorLink {
    fn from(id: AuthorId) -> Self {
        Self::Reference(id)
    }
}

impl From<Author> for AuthorLink {
    fn from(author: Author) -> Self {
        Self::Resolved(Box::new(author))
    }
}

impl BookId {
    pub fn new<T: Into<Id>>(id: T) -> Self {
        Self(id.into())
    }

    /// Parses either a bare identifier or a resource name (`books/{id}`).
    pub fn parse<S: AsRef<str>>(value: S) -> Result<Self, ParseIdError> {
        let value = value.as_ref().trim();
        let value = value.strip_prefix(Book::NAME_PREFIX).unwrap_or(value);
        value.parse().map(Self)
    }

    pub fn to_name(&self) -> String {
        format!("{}{}", Book::NAME_PREFIX, self.0)
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::author::BooksLink;

    fn author(id: AuthorId) -> Author {
        Author {
            id,
            name: "Ursula K. Le Guin".into(),
            bio: None,
            create_time: UtcDateTime::now(),
            update_time: None,
            books: BooksLink::Deferred,
        }
    }

    #[test]
    fn link_id() {
        let id = AuthorId::new(Id::generate());
        let reference = AuthorLink::from(id);
        assert_eq!(reference.id(), id);
        assert!(reference.resolved().is_none());

        let resolved = AuthorLink::from(author(id));
        assert_eq!(resolved.id(), id);
        assert_eq!(resolved.resolved().map(|a| a.name.as_str()), Some("Ursula K. Le Guin"));
    }

    #[test]
    fn parse_id_forms() {
        let id = BookId::new(Id::generate());
        assert_eq!(BookId::parse(id.to_name()).unwrap(), id);
        assert_eq!(id.to_string().parse::<BookId>().unwrap(), id);
        assert!(BookId::parse(format!("authors/{id}")).is_err());
    }
}
