//! Error types for domain validation

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single validation failure.
///
/// `field` is a slash-separated path (`"outer/inner"`). `None` means the error
/// concerns the object as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl DomainError {
    pub fn new(field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Error attributed to a named field
    pub fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Error attributed to the object itself
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Raised when a failed result is forced or a mutator rejects a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} validation {} occurred, see errors for details", .errors.len(), plural(.errors.len()))]
pub struct DomainException {
    errors: Vec<DomainError>,
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "exception"
    } else {
        "exceptions"
    }
}

impl DomainException {
    pub fn new(errors: Vec<DomainError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[DomainError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<DomainError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_message_singular() {
        let ex = DomainException::new(vec![DomainError::root("bad")]);
        assert_eq!(
            ex.to_string(),
            "1 validation exception occurred, see errors for details"
        );
    }

    #[test]
    fn test_exception_message_plural() {
        let ex = DomainException::new(vec![
            DomainError::at("a", "bad"),
            DomainError::at("b", "worse"),
        ]);
        assert_eq!(
            ex.to_string(),
            "2 validation exceptions occurred, see errors for details"
        );
        assert_eq!(ex.errors().len(), 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::at("a/b", "too small").to_string(), "a/b: too small");
        assert_eq!(DomainError::root("empty").to_string(), "empty");
    }

    #[test]
    fn test_root_error_serializes_without_field() {
        let json = serde_json::to_value(DomainError::root("empty")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "empty" }));
    }
}
