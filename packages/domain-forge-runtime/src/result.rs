//! The construction result carrier

use crate::error::{DomainError, DomainException};

/// Outcome of a validated construction.
///
/// `Failure` always carries at least one error when produced by generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a DomainResult may be a Failure; inspect it or call `raise()`"]
pub enum DomainResult<T> {
    Success(T),
    Failure(Vec<DomainError>),
}

impl<T> DomainResult<T> {
    /// Project to the value, turning a failure into a [`DomainException`].
    pub fn raise(self) -> Result<T, DomainException> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(errors) => Err(DomainException::new(errors)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Errors of a failure; empty for a success
    pub fn errors(&self) -> &[DomainError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DomainResult<U> {
        match self {
            Self::Success(value) => DomainResult::Success(f(value)),
            Self::Failure(errors) => DomainResult::Failure(errors),
        }
    }

    pub fn into_result(self) -> Result<T, Vec<DomainError>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(errors) => Err(errors),
        }
    }
}

impl<T> From<DomainResult<T>> for Result<T, DomainException> {
    fn from(result: DomainResult<T>) -> Self {
        result.raise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_success() {
        let result: DomainResult<i32> = DomainResult::Success(7);
        assert_eq!(result.raise().unwrap(), 7);
    }

    #[test]
    fn test_raise_failure_keeps_errors() {
        let errors = vec![DomainError::at("value", "Value is zero")];
        let result: DomainResult<i32> = DomainResult::Failure(errors.clone());
        let ex = result.raise().unwrap_err();
        assert_eq!(ex.errors(), errors.as_slice());
    }

    #[test]
    fn test_map_preserves_failure() {
        let result: DomainResult<i32> = DomainResult::Failure(vec![DomainError::root("no")]);
        let mapped = result.map(|v| v + 1);
        assert!(mapped.is_failure());
        assert_eq!(mapped.errors().len(), 1);
    }
}
