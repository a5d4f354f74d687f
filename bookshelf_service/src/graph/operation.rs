use bookshelf_api::model::{
    author_service::{AddAuthorInput, UpdateAuthorInput},
    book_service::{AddBookInput, UpdateBookInput},
};
use serde::{Deserialize, Serialize};

use crate::graph::selection::Selection;

/// One unit of work: a root field and the selection to render from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub operation: Operation,
    #[serde(default)]
    pub selection: Selection,
}

/// Root query and mutation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "arguments", rename_all = "camelCase")]
pub enum Operation {
    Books,
    Book {
        id: String,
    },
    Authors,
    Author {
        id: String,
    },
    AddAuthor {
        input: AddAuthorInput,
    },
    AddBook {
        input: AddBookInput,
    },
    UpdateAuthor {
        id: String,
        input: UpdateAuthorInput,
    },
    DeleteAuthor {
        id: String,
    },
    UpdateBook {
        id: String,
        input: UpdateBookInput,
    },
    DeleteBook {
        id: String,
    },
}

impl WorkItem {
    pub fn new(operation: Operation, selection: Selection) -> Self {
        Self {
            operation,
            selection,
        }
    }
}

impl Operation {
    /// Name of the root field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Book { .. } => "book",
            Self::Authors => "authors",
            Self::Author { .. } => "author",
            Self::AddAuthor { .. } => "addAuthor",
            Self::AddBook { .. } => "addBook",
            Self::UpdateAuthor { .. } => "updateAuthor",
            Self::DeleteAuthor { .. } => "deleteAuthor",
            Self::UpdateBook { .. } => "updateBook",
            Self::DeleteBook { .. } => "deleteBook",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Books | Self::Book { .. } | Self::Authors | Self::Author { .. }
        )
    }
}
