use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};

use paste::paste;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{author::AuthorId, book::BookId};

#[derive(Error, Debug, Clone, PartialEq)]
#[error(transparent)]
pub enum BookshelfError {
    Book(#[from] BookError),
    Author(#[from] AuthorError),
}

/// Coarse classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A required field is missing or malformed.
    Validation,
    /// A uniqueness rule was violated.
    Conflict,
    /// The store failed underneath an operation.
    Store,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorErrorReason {
    NameRequired,
    NameTooShort,
    NameAlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookErrorReason {
    TitleRequired,
    TitleAlreadyExists,
}

#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookshelfErrorMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BookshelfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Book(err) => err.kind(),
            Self::Author(err) => err.kind(),
        }
    }
}

impl AuthorErrorReason {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::NameRequired => "NAME_REQUIRED",
            Self::NameTooShort => "NAME_TOO_SHORT",
            Self::NameAlreadyExists => "NAME_ALREADY_EXISTS",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NameRequired | Self::NameTooShort => ErrorKind::Validation,
            Self::NameAlreadyExists => ErrorKind::Conflict,
        }
    }
}

impl BookErrorReason {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::TitleRequired => "TITLE_REQUIRED",
            Self::TitleAlreadyExists => "TITLE_ALREADY_EXISTS",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TitleRequired => ErrorKind::Validation,
            Self::TitleAlreadyExists => ErrorKind::Conflict,
        }
    }
}

impl BookshelfErrorMetadata {
    pub fn to_map(&self) -> BTreeMap<String, String> {
        serde_json::to_value(self)
            .and_then(serde_json::from_value)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Display for BookshelfErrorMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.to_map().fmt(f)
    }
}

impl Debug for BookshelfErrorMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = f.debug_struct("BookshelfErrorMetadata");

        macro_rules! debug_fields {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        d.field(stringify!($field), value);
                    }
                )*
            };
        }

        debug_fields![book_id, author_id, name, title];

        d.finish()
    }
}

macro_rules! impl_domain_error {
    ($name:ident) => {
        paste! {
            #[derive(Error, Debug, Clone, PartialEq)]
            pub struct [<$name Error>] {
                pub reason: [<$name ErrorReason>],
                pub message: Option<String>,
                pub metadata: Option<BookshelfErrorMetadata>,
            }

            pub type [<$name Result>]<T> = Result<T, [<$name Error>]>;

            impl [<$name Error>] {
                pub fn new(reason: [<$name ErrorReason>]) -> Self {
                    Self {
                        reason,
                        message: None,
                        metadata: None,
                    }
                }

                pub fn new_with_message<S: ToString>(
                    reason: [<$name ErrorReason>],
                    message: S,
                ) -> Self {
                    Self {
                        reason,
                        message: Some(message.to_string()),
                        metadata: None,
                    }
                }

                pub fn kind(&self) -> ErrorKind {
                    self.reason.kind()
                }

                #[must_use]
                pub fn with_message<S: ToString>(mut self, message: S) -> Self {
                    self.message = Some(message.to_string());
                    self
                }

                fn modify_metadata<F: FnOnce(&mut BookshelfErrorMetadata)>(mut self, f: F) -> Self {
                    let mut metadata = self.metadata.take().unwrap_or_default();
                    f(&mut metadata);
                    self.metadata = Some(metadata);
                    self
                }
            }

            impl Display for [<$name Error>] {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.reason.as_str_name())?;

                    if let Some(message) = self.message.as_ref() {
                        write!(f, ": {}", message)?;
                    } else if let Some(metadata) = self.metadata.as_ref() {
                        write!(f, ": {}", metadata)?;
                    }

                    Ok(())
                }
            }
        }
    };
}

impl_domain_error!(Book);
impl_domain_error!(Author);

macro_rules! impl_bookshelf_metadata_field {
    ($ident:ident, $type:ty, $convert:ident) => {
        paste! {
            #[must_use]
            pub fn [<with_ $ident>] (self, value: $type) -> Self {
                self.modify_metadata(|metadata| {
                    // Don't overwrite existing metadata
                    if metadata.$ident.is_none() {
                        metadata.$ident = Some( value.$convert () );
                    }
                })
            }
        }
    };
}

impl BookError {
    impl_bookshelf_metadata_field!(book_id, &BookId, clone);
    impl_bookshelf_metadata_field!(title, &str, into);
}

impl AuthorError {
    impl_bookshelf_metadata_field!(author_id, &AuthorId, clone);
    impl_bookshelf_metadata_field!(name, &str, into);
}
