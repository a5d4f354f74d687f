use serde::{Deserialize, Serialize};

/// Input of the explicit author creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAuthorInput {
    pub name: String,
    pub bio: Option<String>,
}

/// Partial author update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorInput {
    pub name: Option<String>,
    /// `null` is read as absent; a biography can be replaced but not cleared.
    pub bio: Option<String>,
}
