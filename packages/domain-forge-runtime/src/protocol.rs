//! Construction and mutation protocol helpers
//!
//! Emitted constructors run in two phases:
//!
//! 1. every nested result is aggregated with [`nested`] / [`nested_list`];
//!    if any of them failed, construction stops before any rule runs
//! 2. every rule is evaluated with [`check`] against the unwrapped values
//!
//! Mutators use the same helpers against a single field.

use crate::error::DomainError;
use crate::result::DomainResult;
use crate::rule::RuleOutcome;

/// Compose the path of an inner error with the path of the field holding it.
///
/// - empty or missing inner path: the outer path is used verbatim
/// - otherwise `outer/inner`, or just `inner` when the outer field has no path
pub fn compose_path(outer: Option<&str>, inner: Option<&str>) -> Option<String> {
    match (outer, inner) {
        (outer, None) | (outer, Some("")) => outer.map(str::to_string),
        (Some(outer), Some(inner)) => Some(format!("{}/{}", outer, inner)),
        (None, Some(inner)) => Some(inner.to_string()),
    }
}

fn prefix_errors(errors: &mut Vec<DomainError>, path: Option<&str>, inner: Vec<DomainError>) {
    errors.extend(inner.into_iter().map(|e| DomainError {
        field: compose_path(path, e.field.as_deref()),
        message: e.message,
    }));
}

/// Aggregate a single nested result.
///
/// Returns the inner value on success; on failure its errors are appended to
/// `errors` under `path` and `None` is returned.
pub fn nested<T>(
    errors: &mut Vec<DomainError>,
    path: Option<&str>,
    result: DomainResult<T>,
) -> Option<T> {
    match result {
        DomainResult::Success(value) => Some(value),
        DomainResult::Failure(inner) => {
            prefix_errors(errors, path, inner);
            None
        }
    }
}

/// Aggregate an ordered sequence of nested results.
///
/// Every element is inspected, so all failing elements contribute errors.
/// The element index is not part of the path. Returns the unwrapped values
/// only when every element succeeded.
pub fn nested_list<T, I>(errors: &mut Vec<DomainError>, path: Option<&str>, items: I) -> Option<Vec<T>>
where
    I: IntoIterator<Item = DomainResult<T>>,
{
    let mut values = Vec::new();
    let mut failed = false;
    for item in items {
        match item {
            DomainResult::Success(value) => values.push(value),
            DomainResult::Failure(inner) => {
                prefix_errors(errors, path, inner);
                failed = true;
            }
        }
    }
    if failed {
        None
    } else {
        Some(values)
    }
}

/// Evaluate one rule's outcome into the accumulator.
///
/// `default_path` is the path of the rule's first parameter and is attached to
/// plain-message violations.
pub fn check(errors: &mut Vec<DomainError>, default_path: Option<&str>, outcome: impl Into<RuleOutcome>) {
    errors.extend(outcome.into().into_errors(default_path));
}
