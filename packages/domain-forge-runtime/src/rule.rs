//! Validation rule outcomes
//!
//! Rules may return plain messages or structured errors. Both are folded into
//! [`RuleOutcome`] so generated code treats every rule the same way.

use crate::error::DomainError;

/// One failure reported by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Attributed to the rule's first parameter
    Message(String),
    /// Carries its own path
    Error(DomainError),
}

/// Result of evaluating a single validation rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RuleOutcome {
    #[default]
    Valid,
    Violations(Vec<Violation>),
}

impl RuleOutcome {
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Valid => true,
            Self::Violations(v) => v.is_empty(),
        }
    }

    /// Convert into structured errors. Plain messages take `default_path`.
    pub fn into_errors(self, default_path: Option<&str>) -> Vec<DomainError> {
        match self {
            Self::Valid => Vec::new(),
            Self::Violations(violations) => violations
                .into_iter()
                .map(|v| match v {
                    Violation::Message(message) => DomainError {
                        field: default_path.map(str::to_string),
                        message,
                    },
                    Violation::Error(error) => error,
                })
                .collect(),
        }
    }
}

impl From<()> for RuleOutcome {
    fn from(_: ()) -> Self {
        Self::Valid
    }
}

impl From<Vec<String>> for RuleOutcome {
    fn from(messages: Vec<String>) -> Self {
        Self::Violations(messages.into_iter().map(Violation::Message).collect())
    }
}

impl From<Vec<&str>> for RuleOutcome {
    fn from(messages: Vec<&str>) -> Self {
        Self::Violations(
            messages
                .into_iter()
                .map(|m| Violation::Message(m.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<DomainError>> for RuleOutcome {
    fn from(errors: Vec<DomainError>) -> Self {
        Self::Violations(errors.into_iter().map(Violation::Error).collect())
    }
}

// A rule returning `None` reports nothing.
impl<T: Into<RuleOutcome>> From<Option<T>> for RuleOutcome {
    fn from(outcome: Option<T>) -> Self {
        outcome.map(Into::into).unwrap_or_default()
    }
}
