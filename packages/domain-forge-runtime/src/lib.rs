//! Domain Forge Runtime
//!
//! The small set of types that code generated by `domain-forge` links against.
//!
//! ## Channels
//!
//! - **Construction** returns a [`DomainResult`]: either the fully built value or
//!   a non-empty list of [`DomainError`]s. Constructors never fail any other way.
//! - **Mutation** returns `Result<(), DomainException>`. A rejected mutation
//!   leaves the instance exactly as it was.
//!
//! ## Concurrency
//!
//! Generated mutators take `&mut self`, so at most one mutator call can be in
//! flight per instance. Instances shared across threads need external
//! synchronisation (e.g. a `Mutex`); no internal locking is performed.

pub mod error;
pub mod protocol;
pub mod result;
pub mod rule;

pub use error::{DomainError, DomainException};
pub use protocol::{check, compose_path, nested, nested_list};
pub use result::DomainResult;
pub use rule::{RuleOutcome, Violation};

/// Capability implemented by every domain object.
///
/// Generated types implement it automatically. Hand-written types that
/// implement it are treated as nested domain objects by the compiler.
pub trait DomainObject: Sized {
    /// Wrap an already valid instance in a successful result.
    fn to_result(self) -> DomainResult<Self>;
}
