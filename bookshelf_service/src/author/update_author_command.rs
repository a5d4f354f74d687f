use bookshelf_api::model::author::{Author, AuthorId};
use bookshelf_common::date_time::UtcDateTime;
use tracing::{info, warn};

use crate::{
    author::{
        name_taken,
        repository::{AUTHOR_NAME_INDEX, AuthorRecordUpdate, AuthorRepositoryArc},
    },
    error::{AppError, AppResult, StoreContext},
    validation::normalize_author_name,
};

/// Command for partially updating authors.
#[derive(Debug, Clone)]
pub struct UpdateAuthorCommand {
    author_repository: AuthorRepositoryArc,
}

/// Input data for updating an author.
///
/// Only provided fields are written.
#[derive(Debug, Clone)]
pub struct UpdateAuthorCommandInput<'a> {
    pub id: AuthorId,
    pub name: Option<&'a str>,
    pub bio: Option<&'a str>,
}

impl UpdateAuthorCommand {
    pub fn new(author_repository: AuthorRepositoryArc) -> Self {
        Self { author_repository }
    }

    /// Executes the author update command.
    ///
    /// # Returns
    ///
    /// The updated author, or `None` when no author has the given ID.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid name, a conflict when the
    /// new name belongs to another author, or a store error.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: UpdateAuthorCommandInput<'_>) -> AppResult<Option<Author>> {
        let target = input.id.to_name();

        let existing = self
            .author_repository
            .select(&input.id)
            .await
            .context("get author", &target)?;
        if existing.is_none() {
            warn!(author_id = %input.id, "Author to update not found");
            return Ok(None);
        }

        let name = input.name.map(normalize_author_name).transpose()?;

        if let Some(name) = name {
            let holder = self
                .author_repository
                .select_by_name(name)
                .await
                .context("find author by name", name)?;
            if let Some(holder) = holder.filter(|holder| holder.id != input.id) {
                return Err(name_taken(name).with_author_id(&holder.id).into());
            }
        }

        let updated = self
            .author_repository
            .update(AuthorRecordUpdate {
                id: &input.id,
                update_time: UtcDateTime::now(),
                name,
                bio: input.bio,
            })
            .await;

        let updated = match updated {
            Ok(updated) => updated,
            Err(err) if err.is_unique_violation(AUTHOR_NAME_INDEX) => {
                return Err(name_taken(name.unwrap_or_default())
                    .with_author_id(&input.id)
                    .into());
            }
            Err(err) => return Err(AppError::store("update author", &target, err)),
        };

        match updated {
            Some(record) => {
                info!(author_id = %input.id, "Updated author");
                Ok(Some(record.into()))
            }
            None => {
                warn!(author_id = %input.id, "Author to update not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bookshelf_api::model::error::ErrorKind;
    use bookshelf_common::id::Id;

    use super::*;
    use crate::author::repository::{
        AuthorRecordInsert, AuthorRepository, memory::MemoryAuthorRepository,
    };

    async fn insert(repository: &MemoryAuthorRepository, name: &str) -> AuthorId {
        repository
            .insert(AuthorRecordInsert {
                id: AuthorId::new(Id::generate()),
                create_time: UtcDateTime::now(),
                name: name.into(),
                bio: Some("Original bio".into()),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn partial_update() {
        let repository = Arc::new(MemoryAuthorRepository::new());
        let id = insert(&repository, "Jane").await;
        let command = UpdateAuthorCommand::new(repository.clone());

        let author = command
            .execute(UpdateAuthorCommandInput {
                id,
                name: Some(" Jane Austen "),
                bio: None,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(author.name, "Jane Austen");
        assert_eq!(author.bio.as_deref(), Some("Original bio"));
        assert!(author.update_time.is_some());

        // Changing only the casing of its own name is allowed.
        let author = command
            .execute(UpdateAuthorCommandInput {
                id,
                name: Some("JANE AUSTEN"),
                bio: None,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(author.name, "JANE AUSTEN");
    }

    #[tokio::test]
    async fn missing_author() {
        let command = UpdateAuthorCommand::new(Arc::new(MemoryAuthorRepository::new()));
        let author = command
            .execute(UpdateAuthorCommandInput {
                id: AuthorId::new(Id::generate()),
                name: None,
                bio: Some("Nobody"),
            })
            .await
            .unwrap();
        assert!(author.is_none());

        // Not found takes precedence over an invalid name.
        let author = command
            .execute(UpdateAuthorCommandInput {
                id: AuthorId::new(Id::generate()),
                name: Some(" "),
                bio: None,
            })
            .await
            .unwrap();
        assert!(author.is_none());
    }

    #[tokio::test]
    async fn rename_to_taken_name() {
        let repository = Arc::new(MemoryAuthorRepository::new());
        insert(&repository, "Jane Austen").await;
        let id = insert(&repository, "Mary Shelley").await;
        let command = UpdateAuthorCommand::new(repository.clone());

        let err = command
            .execute(UpdateAuthorCommandInput {
                id,
                name: Some("jane austen"),
                bio: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            repository.select(&id).await.unwrap().unwrap().name,
            "Mary Shelley"
        );
    }
}
