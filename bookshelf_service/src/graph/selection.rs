use std::slice;

use serde::{Deserialize, Deserializer, Serialize};

/// Fields selected on an object.
///
/// An empty selection selects every scalar field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<Field>);

/// A selected field, written either as its bare name or as an object with an
/// alias and nested selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Selection::is_empty")]
    pub selection: Selection,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        alias: Option<String>,
        #[serde(default)]
        selection: Selection,
    },
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Field> {
        self.0.iter()
    }
}

impl FromIterator<Field> for Selection {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Field;
    type IntoIter = slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Field {
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            selection: Selection::default(),
        }
    }

    #[must_use]
    pub fn with_alias<S: ToString>(mut self, alias: S) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Key of this field in the rendered object.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match FieldRepr::deserialize(deserializer)? {
            FieldRepr::Name(name) => Self::new(name),
            FieldRepr::Full {
                name,
                alias,
                selection,
            } => Self {
                name,
                alias,
                selection,
            },
        })
    }
}
