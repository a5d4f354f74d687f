use std::sync::Arc;

use bookshelf_api::model::author::{Author, AuthorId};
use bookshelf_common::{date_time::UtcDateTime, id::worker::WorkerIdGenerator};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    author::{
        name_taken,
        repository::{AUTHOR_NAME_INDEX, AuthorRecordInsert, AuthorRepositoryArc},
    },
    error::{AppError, AppResult, StoreContext},
    validation::normalize_author_name,
};

/// Command for creating new authors.
///
/// Fails when an author with the same name exists, ignoring case.
#[derive(Debug, Clone)]
pub struct CreateAuthorCommand {
    id_generator: Arc<Mutex<WorkerIdGenerator>>,
    author_repository: AuthorRepositoryArc,
}

/// Input data for creating an author.
#[derive(Debug, Clone)]
pub struct CreateAuthorCommandInput<'a> {
    /// Author name, trimmed before use
    pub name: &'a str,
    /// Optional biography
    pub bio: Option<&'a str>,
}

/// Output data from author creation.
#[derive(Debug, Clone)]
pub struct CreateAuthorCommandOutput {
    /// The created author, with no books
    pub author: Author,
}

impl CreateAuthorCommand {
    /// Creates a new `CreateAuthorCommand`.
    ///
    /// # Arguments
    ///
    /// * `id_generator` - Generator for creating unique author IDs
    /// * `author_repository` - Repository for persisting author data
    pub fn new(
        id_generator: Arc<Mutex<WorkerIdGenerator>>,
        author_repository: AuthorRepositoryArc,
    ) -> Self {
        Self {
            id_generator,
            author_repository,
        }
    }

    /// Executes the author creation command.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or short name, a conflict
    /// when the name is taken, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        input: CreateAuthorCommandInput<'_>,
    ) -> AppResult<CreateAuthorCommandOutput> {
        let name = normalize_author_name(input.name)?;
        info!(name = %name, "Creating author");

        let existing = self
            .author_repository
            .select_by_name(name)
            .await
            .context("find author by name", name)?;
        if let Some(existing) = existing {
            return Err(name_taken(name).with_author_id(&existing.id).into());
        }

        let id = AuthorId::new(self.id_generator.lock().await.generate_async().await);
        let record = match self
            .author_repository
            .insert(AuthorRecordInsert {
                id,
                create_time: UtcDateTime::now(),
                name: name.to_string(),
                bio: input.bio.map(ToString::to_string),
            })
            .await
        {
            Ok(record) => record,
            Err(err) if err.is_unique_violation(AUTHOR_NAME_INDEX) => {
                return Err(name_taken(name).into());
            }
            Err(err) => return Err(AppError::store("create author", name, err)),
        };

        info!(author_id = %id, "Successfully created author");

        Ok(CreateAuthorCommandOutput {
            author: record.into(),
        })
    }
}
