use serde::{Deserialize, Serialize};

/// Input of book creation.
///
/// The author is linked by name and created when no author matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookInput {
    pub title: String,
    pub author_name: String,
    pub synopsis: Option<String>,
}

/// Partial book update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookInput {
    pub title: Option<String>,
    /// `null` is read as absent; a synopsis can be replaced but not cleared.
    pub synopsis: Option<String>,
    pub author_name: Option<String>,
}
