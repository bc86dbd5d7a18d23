//! Domain Type Index
//!
//! Phase 1 of the pipeline: collect the identity of every schema-bearing type
//! before any field is classified. The index is frozen once built and shared
//! read-only by every per-schema analysis in phase 2.

use std::collections::HashSet;

use crate::config::ForgeConfig;
use crate::decl::{DeclarationGraph, TypeRef};

/// Identity of a type: qualified path plus generic arity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub path: String,
    pub arity: usize,
}

impl TypeKey {
    pub fn of(ty: &TypeRef) -> Self {
        Self {
            path: ty.path.clone(),
            arity: ty.arity(),
        }
    }
}

/// The set of types that are domain objects
#[derive(Debug, Clone, Default)]
pub struct DomainTypeIndex {
    keys: HashSet<TypeKey>,
}

impl DomainTypeIndex {
    /// Build from a graph: marked declarations plus declarations implementing
    /// the capability trait.
    pub fn build(graph: &DeclarationGraph, config: &ForgeConfig) -> Self {
        let keys = graph
            .types
            .iter()
            .filter(|t| t.domain || t.implements_trait(&config.runtime.capability))
            .map(|t| TypeKey {
                path: t.qualified_name(),
                arity: t.generics.len(),
            })
            .collect();
        Self { keys }
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.keys.contains(&TypeKey::of(ty))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
