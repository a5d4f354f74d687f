use std::fmt::Display;

use bookshelf_api::model::error::{AuthorError, BookError, BookshelfError, ErrorKind};
use thiserror::Error;
use tracing::error;

use crate::store::error::{StoreError, StoreResult};

/// Application error types.
///
/// Represents all possible errors that can occur in the bookshelf service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Internal application error.
    ///
    /// Configuration, I/O and other failures outside the entity operations.
    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Domain rule violation.
    ///
    /// Validation failures and uniqueness conflicts on authors and books.
    #[error(transparent)]
    Domain(#[from] BookshelfError),

    /// Store failure wrapped with the operation and the entity it targeted.
    #[error("{operation} failed for `{target}`: {source}")]
    Store {
        operation: &'static str,
        target: String,
        #[source]
        source: StoreError,
    },

    /// A work item selected a field the type does not have.
    #[error("unknown field `{field}` on type `{type_name}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
}

/// Application result type.
///
/// Type alias for Result with `AppError` as the error type.
pub type AppResult<T> = Result<T, AppError>;

macro_rules! impl_internal_errors {
    ( $( $type:ty ),* $(,)? ) => {
        $(
        impl From<$type> for AppError {
            fn from(err: $type) -> Self {
                AppError::Internal(Box::new(err))
            }
        }
        )*
    };
}
impl_internal_errors!(
    config::ConfigError,
    std::io::Error,
    serde_json::Error,
    tracing_subscriber::util::TryInitError,
);

macro_rules! impl_domain_errors {
    ( $( $type:ty ),* $(,)? ) => {
        $(
        impl From<$type> for AppError {
            fn from(err: $type) -> Self {
                BookshelfError::from(err).into()
            }
        }
        )*
    };
}
impl_domain_errors!(AuthorError, BookError);

impl AppError {
    pub fn store<D: Display>(operation: &'static str, target: D, source: StoreError) -> Self {
        Self::Store {
            operation,
            target: target.to_string(),
            source,
        }
    }

    /// Classifies the error for the transport collaborator.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Store { .. } => ErrorKind::Store,
            Self::UnknownField { .. } => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to a caller.
    ///
    /// Internal failures are logged and replaced by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => {
                error!("internal service error: {}", self);
                "internal error".into()
            }
            Self::Store { .. } => {
                error!("store error: {}", self);
                self.to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Attaches operation context to store results.
pub trait StoreContext<T> {
    /// # Errors
    ///
    /// Wraps the store error into [`AppError::Store`].
    fn context<D: Display>(self, operation: &'static str, target: D) -> AppResult<T>;
}

impl<T> StoreContext<T> for StoreResult<T> {
    fn context<D: Display>(self, operation: &'static str, target: D) -> AppResult<T> {
        self.map_err(|source| AppError::store(operation, target, source))
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_api::model::error::{AuthorErrorReason, BookErrorReason};

    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            AppError::from(AuthorError::new(AuthorErrorReason::NameAlreadyExists)).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::from(BookError::new(BookErrorReason::TitleRequired)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::UnknownField {
                type_name: "Book",
                field: "isbn".into()
            }
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn store_context() {
        let result: StoreResult<()> = Err(StoreError::Closed);
        let err = result.context("delete author", "authors/42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(
            err.to_string(),
            "delete author failed for `authors/42`: store is closed"
        );
    }
}
