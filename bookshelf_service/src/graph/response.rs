use bookshelf_api::model::error::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Outcome of one work item, as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    Data(Value),
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn error<S: ToString>(kind: ErrorKind, message: S) -> Self {
        Self::Error {
            kind,
            message: message.to_string(),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Error { .. } => None,
        }
    }
}

impl From<AppError> for Response {
    fn from(err: AppError) -> Self {
        Self::error(err.kind(), err.public_message())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize() {
        assert_eq!(
            serde_json::to_value(Response::Data(json!({"deleteBook": true}))).unwrap(),
            json!({"data": {"deleteBook": true}})
        );
        assert_eq!(
            serde_json::to_value(Response::error(ErrorKind::Conflict, "taken")).unwrap(),
            json!({"error": {"kind": "CONFLICT", "message": "taken"}})
        );
    }
}
