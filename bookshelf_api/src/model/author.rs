use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use bookshelf_common::{
    date_time::UtcDateTime,
    id::{Id, ParseIdError},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::book::Book;

/// A persisted author.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub bio: Option<String>,
    pub create_time: UtcDateTime,
    pub update_time: Option<UtcDateTime>,
    pub books: BooksLink,
}

/// Back-relationship from an author to the books referencing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BooksLink {
    /// Not fetched yet.
    #[default]
    Deferred,
    /// Books already materialized by the fetch that produced the author.
    Resolved(Vec<Book>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthorId(pub Id);

impl Author {
    pub const NAME_PREFIX: &'static str = "authors/";
    pub const NAME_MIN_LENGTH: usize = 2;

    /// Key under which author names are compared for uniqueness.
    pub fn name_key<S: AsRef<str>>(name: S) -> String {
        name.as_ref().trim().to_lowercase()
    }
}

impl BooksLink {
    /// Returns the embedded books only when there is at least one.
    ///
    /// An embedded empty list is indistinguishable from "not fetched".
    pub fn populated(&self) -> Option<&[Book]> {
        match self {
            Self::Resolved(books) if !books.is_empty() => Some(books),
            _ => None,
        }
    }
}

impl AuthorId {
    pub fn new<T: Into<Id>>(id: T) -> Self {
        Self(id.into())
    }

    /// Parses either a bare identifier or a resource name (`authors/{id}`).
    pub fn parse<S: AsRef<str>>(value: S) -> Result<Self, ParseIdError> {
        let value = value.as_ref().trim();
        let value = value.strip_prefix(Author::NAME_PREFIX).unwrap_or(value);
        value.parse().map(Self)
    }

    pub fn to_name(&self) -> String {
        format!("{}{}", Author::NAME_PREFIX, self.0)
    }
}

impl Display for AuthorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AuthorId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AuthorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AuthorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_forms() {
        let id = AuthorId::new(Id::generate());
        assert_eq!(AuthorId::parse(id.to_string()).unwrap(), id);
        assert_eq!(AuthorId::parse(id.to_name()).unwrap(), id);
        assert_eq!(AuthorId::parse(format!("  {id} ")).unwrap(), id);
        assert!(AuthorId::parse("books/123").is_err());
        assert!(AuthorId::parse("").is_err());
    }

    #[test]
    fn name_comparison() {
        assert_eq!(Author::name_key("  Frank HERBERT "), "frank herbert");
        assert_eq!(Author::name_key("ÉMILE Zola"), Author::name_key("émile zola"));
    }

    #[test]
    fn populated_books() {
        assert!(BooksLink::Deferred.populated().is_none());
        assert!(BooksLink::Resolved(Vec::new()).populated().is_none());
    }
}
