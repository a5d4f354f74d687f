use bookshelf_api::model::{
    author::Author,
    error::{AuthorError, AuthorErrorReason, AuthorResult, BookError, BookErrorReason, BookResult},
};

/// Trims an author name and checks it is long enough to store.
pub fn normalize_author_name(name: &str) -> AuthorResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthorError::new(AuthorErrorReason::NameRequired));
    }
    if name.chars().count() < Author::NAME_MIN_LENGTH {
        return Err(AuthorError::new_with_message(
            AuthorErrorReason::NameTooShort,
            format!(
                "author name must have at least {} characters",
                Author::NAME_MIN_LENGTH
            ),
        )
        .with_name(name));
    }
    Ok(name)
}

/// Trims a book title and checks it is not empty.
pub fn normalize_title(title: &str) -> BookResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BookError::new(BookErrorReason::TitleRequired));
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_names() {
        assert_eq!(normalize_author_name("  Jane Austen ").unwrap(), "Jane Austen");
        assert_eq!(
            normalize_author_name("   ").unwrap_err().reason,
            AuthorErrorReason::NameRequired
        );
        assert_eq!(
            normalize_author_name(" J ").unwrap_err().reason,
            AuthorErrorReason::NameTooShort
        );
        assert_eq!(normalize_author_name("Jo").unwrap(), "Jo");
    }

    #[test]
    fn titles() {
        assert_eq!(normalize_title(" It ").unwrap(), "It");
        assert_eq!(
            normalize_title("").unwrap_err().reason,
            BookErrorReason::TitleRequired
        );
    }
}
