//! Schema analysis pipeline
//!
//! Two phases over one declaration graph:
//!
//! 1. [`DomainTypeIndex::build`] records every schema-bearing type.
//! 2. Each domain declaration is extracted into a [`Schema`](crate::schema::Schema)
//!    and bound into a [`BoundSchema`].
//!
//! Phase 2 schemas share nothing but the frozen index, so each one is analysed
//! independently and failures never leak between schemas.

pub mod bind;
pub mod diagnostics;
pub mod extract;
pub mod index;
pub mod nesting;

use std::collections::HashSet;

use tracing::{debug, info, warn};

pub use bind::{bind, BoundSchema, DependencyIndex};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use extract::{extract, Extraction};
pub use index::{DomainTypeIndex, TypeKey};
pub use nesting::{NestingEdge, NestingGraph};

use crate::config::ForgeConfig;
use crate::decl::{DeclarationGraph, TypeDecl};

/// Outcome of analysing a whole declaration graph
#[derive(Debug, Clone)]
pub struct Analysis {
    pub index: DomainTypeIndex,
    /// Schemas ready for emission, in declaration order
    pub schemas: Vec<BoundSchema>,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn schema(&self, name: &str) -> Option<&BoundSchema> {
        self.schemas.iter().find(|b| b.schema.name == name)
    }

    /// Errors fail the run; warnings too when `warnings_as_errors` is set
    pub fn failed(&self, config: &ForgeConfig) -> bool {
        self.diagnostics.has_errors()
            || (config.diagnostics.warnings_as_errors && self.diagnostics.warning_count() > 0)
    }
}

/// Run both phases over `graph`
pub fn analyze(graph: &DeclarationGraph, config: &ForgeConfig) -> Analysis {
    info!(types = graph.types.len(), "Indexing domain types");
    let index = DomainTypeIndex::build(graph, config);

    info!(domain_types = index.len(), "Analysing schemas");
    let mut diagnostics = Diagnostics::new();
    let mut schemas = Vec::new();
    let mut seen = HashSet::new();

    for decl in graph.domain_types() {
        let name = decl.qualified_name();

        if !seen.insert(name.clone()) {
            warn!(schema = %name, "Duplicate schema skipped");
            diagnostics.report(
                &name,
                &decl.name,
                DiagnosticCode::DuplicateSchema,
                format!("Schema {} is declared more than once", name),
            );
            continue;
        }

        match analyze_schema(decl, &index, config) {
            Ok((bound, found)) => {
                debug!(schema = %name, diagnostics = found.len(), "Schema ready for emission");
                diagnostics.merge(found);
                schemas.push(bound);
            }
            Err(found) => {
                warn!(schema = %name, errors = found.error_count(), "Schema skipped");
                diagnostics.merge(found);
            }
        }
    }

    info!(
        emitted = schemas.len(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "Analysis complete"
    );

    Analysis {
        index,
        schemas,
        diagnostics,
    }
}

/// Extract and bind one declaration against a built index
pub fn analyze_schema(
    decl: &TypeDecl,
    index: &DomainTypeIndex,
    config: &ForgeConfig,
) -> Result<(BoundSchema, Diagnostics), Diagnostics> {
    let Extraction {
        schema,
        mut diagnostics,
    } = extract(decl, index, config)?;

    match bind(schema) {
        Ok((bound, found)) => {
            diagnostics.merge(found);
            Ok((bound, diagnostics))
        }
        Err(found) => {
            diagnostics.merge(found);
            Err(diagnostics)
        }
    }
}
