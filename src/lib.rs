//! Domain Forge
//!
//! A schema compiler for domain objects: types whose instances must satisfy
//! field-level and cross-field rules, so that invalid instances never exist.
//!
//! ## Pipeline
//!
//! ```text
//! DeclarationGraph ──► DomainTypeIndex ──► extract ──► bind ──► emit
//!   (decl)             (phase 1)           (phase 2, per schema)
//! ```
//!
//! For every domain declaration the compiler emits:
//! - `try_new`, a constructor that aggregates nested results, runs every
//!   validation rule, and returns a [`runtime::DomainResult`]
//! - `to_result`, through the [`runtime::DomainObject`] capability
//! - one `set_*` mutator per settable field, re-running only the rules that
//!   reference that field
//!
//! Schema problems are reported as [`analysis::Diagnostics`] and never reach
//! generated code.

pub mod analysis;
pub mod checksum;
pub mod codegen;
pub mod config;
pub mod decl;
pub mod drift;
pub mod error;
pub mod schema;

pub use domain_forge_runtime as runtime;

pub use analysis::{analyze, Analysis, BoundSchema, Diagnostics, DomainTypeIndex};
pub use checksum::Fingerprint;
pub use codegen::{compile, compile_strict, GeneratedOutput, GeneratedUnit};
pub use config::ForgeConfig;
pub use decl::DeclarationGraph;
pub use error::{ForgeError, Result};
pub use schema::{Field, Schema, ValidationRule};
