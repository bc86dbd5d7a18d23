//! Semantic Binder
//!
//! Resolves every rule parameter against the field table of its schema and
//! builds the field -> rules dependency index used by mutator synthesis.

use std::collections::HashMap;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::debug;

use super::diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
use crate::schema::{Field, Schema, ValidationRule};

/// Field name -> positions of the rules referencing it, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl DependencyIndex {
    pub fn build(rules: &[ValidationRule]) -> Self {
        let mut entries: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            for param in &rule.params {
                let slot = entries.entry(param.name.clone()).or_default();
                // a field listed twice by one rule still maps to it once
                if slot.last() != Some(&position) {
                    slot.push(position);
                }
            }
        }
        Self { entries }
    }

    pub fn rules_for(&self, field: &str) -> &[usize] {
        self.entries.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A schema whose rules all bind to fields of identical type
#[derive(Debug, Clone)]
pub struct BoundSchema {
    pub schema: Schema,
    pub index: DependencyIndex,
}

impl BoundSchema {
    /// Rules referencing `field`, in declaration order
    pub fn rules_for<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a ValidationRule> + 'a {
        self.index
            .rules_for(field)
            .iter()
            .filter_map(move |&i| self.schema.rules.get(i))
    }
}

/// Bind the rules of `schema`.
///
/// An unresolved parameter aborts the schema. A type mismatch drops only the
/// rule it occurs in.
pub fn bind(schema: Schema) -> Result<(BoundSchema, Diagnostics), Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let mut unresolved = false;
    let mut kept = Vec::with_capacity(schema.rules.len());

    for rule in &schema.rules {
        let mut mismatched = false;

        for param in &rule.params {
            let Some(field) = schema.field(&param.name) else {
                let suggestion = suggest(&schema.fields, &param.name);
                diagnostics.member_not_found(&schema.name, &rule.name, &param.name, suggestion);
                unresolved = true;
                continue;
            };

            if field.ty != param.ty {
                diagnostics.push(
                    DiagnosticItem::new(
                        &schema.name,
                        DiagnosticCode::TypeMismatch,
                        format!(
                            "Type mismatch for {}: expected {}, found {}",
                            param.name, field.ty, param.ty
                        ),
                    )
                    .at_member(format!("{}({})", rule.name, param.name))
                    .with_context(format!("rule `{}` is not emitted", rule.name)),
                );
                mismatched = true;
            }
        }

        if !mismatched {
            kept.push(rule.clone());
        }
    }

    if unresolved {
        return Err(diagnostics);
    }

    let index = DependencyIndex::build(&kept);
    debug!(schema = %schema.name, rules = kept.len(), indexed_fields = index.len(), "bound schema");

    let schema = Schema { rules: kept, ..schema };
    Ok((BoundSchema { schema, index }, diagnostics))
}

/// Closest field name to an unresolved parameter
fn suggest<'a>(fields: &'a [Field], name: &str) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    fields
        .iter()
        .filter_map(|f| {
            matcher
                .fuzzy_match(&f.name, name)
                .or_else(|| matcher.fuzzy_match(name, &f.name))
                .map(|score| (score, f.name.as_str()))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name)
}
