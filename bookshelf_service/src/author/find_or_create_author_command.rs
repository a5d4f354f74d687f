use std::sync::Arc;

use bookshelf_api::model::author::{Author, AuthorId};
use bookshelf_common::{date_time::UtcDateTime, id::worker::WorkerIdGenerator};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    author::repository::{AUTHOR_NAME_INDEX, AuthorRecordInsert, AuthorRepositoryArc},
    error::{AppError, AppResult, StoreContext},
    validation::normalize_author_name,
};

/// Looks an author up by name, creating one when none matches.
///
/// Never fails with a conflict: a concurrent insert of the same name is
/// resolved by selecting the winner.
#[derive(Debug, Clone)]
pub struct FindOrCreateAuthorCommand {
    id_generator: Arc<Mutex<WorkerIdGenerator>>,
    author_repository: AuthorRepositoryArc,
}

#[derive(Debug, Clone)]
pub struct FindOrCreateAuthorCommandOutput {
    pub author: Author,
    /// Whether the author was inserted by this call
    pub created: bool,
}

impl FindOrCreateAuthorCommand {
    pub fn new(
        id_generator: Arc<Mutex<WorkerIdGenerator>>,
        author_repository: AuthorRepositoryArc,
    ) -> Self {
        Self {
            id_generator,
            author_repository,
        }
    }

    /// # Errors
    ///
    /// Returns a validation error for a missing or short name, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, name: &str) -> AppResult<FindOrCreateAuthorCommandOutput> {
        let name = normalize_author_name(name)?;

        if let Some(author) = self.find(name).await? {
            debug!(author_id = %author.id, "Found author by name");
            return Ok(FindOrCreateAuthorCommandOutput {
                author,
                created: false,
            });
        }

        let id = AuthorId::new(self.id_generator.lock().await.generate_async().await);
        let inserted = self
            .author_repository
            .insert(AuthorRecordInsert {
                id,
                create_time: UtcDateTime::now(),
                name: name.to_string(),
                bio: None,
            })
            .await;

        match inserted {
            Ok(record) => {
                info!(author_id = %id, name = %name, "Created author for book");
                Ok(FindOrCreateAuthorCommandOutput {
                    author: record.into(),
                    created: true,
                })
            }
            Err(err) if err.is_unique_violation(AUTHOR_NAME_INDEX) => {
                debug!(name = %name, "Author created concurrently");
                let author = self
                    .find(name)
                    .await?
                    .ok_or_else(|| AppError::store("find or create author", name, err))?;
                Ok(FindOrCreateAuthorCommandOutput {
                    author,
                    created: false,
                })
            }
            Err(err) => Err(AppError::store("find or create author", name, err)),
        }
    }

    async fn find(&self, name: &str) -> AppResult<Option<Author>> {
        Ok(self
            .author_repository
            .select_by_name(name)
            .await
            .context("find author by name", name)?
            .map(Into::into))
    }
}
