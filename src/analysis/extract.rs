//! Schema Extraction
//!
//! Walks one domain declaration and classifies each member:
//! - fields become [`Field`]s with a domain kind, error path, and mutability
//! - methods carrying the validation marker become [`ValidationRule`]s
//!
//! Structural problems are reported as diagnostics. Extraction fails when any
//! of them blocks emission for the schema.

use tracing::debug;

use super::diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
use super::index::DomainTypeIndex;
use crate::config::ForgeConfig;
use crate::decl::{AccessorKind, FieldDecl, MethodDecl, Receiver, RenameArg, TypeDecl, TypeRef, Visibility};
use crate::schema::{DomainKind, Field, Mutability, ReturnShape, Schema, ValidationRule};

/// A successfully extracted schema with any non-blocking diagnostics
#[derive(Debug, Clone)]
pub struct Extraction {
    pub schema: Schema,
    pub diagnostics: Diagnostics,
}

/// Extract the schema of a domain declaration.
///
/// Returns `Err` with all diagnostics when a blocking one was raised.
pub fn extract(
    decl: &TypeDecl,
    index: &DomainTypeIndex,
    config: &ForgeConfig,
) -> Result<Extraction, Diagnostics> {
    let name = decl.qualified_name();
    let mut diagnostics = Diagnostics::new();

    if !decl.extensible {
        diagnostics.report(
            &name,
            &decl.name,
            DiagnosticCode::NonExtensibleDeclaration,
            "Declaration must be extensible for generation",
        );
    }

    if let Some(parent) = &decl.parent {
        diagnostics.report(
            &name,
            &decl.name,
            DiagnosticCode::NestedDeclaration,
            format!("Declaration cannot be nested for generation (inside {})", parent),
        );
    }

    let fields: Vec<Field> = decl
        .fields()
        .map(|f| extract_field(&name, f, index, config, &mut diagnostics))
        .collect();

    let rules: Vec<ValidationRule> = decl
        .methods()
        .filter(|m| m.validation)
        .filter_map(|m| extract_rule(&name, m, &mut diagnostics))
        .collect();

    if diagnostics.blocks(&name) {
        return Err(diagnostics);
    }

    debug!(schema = %name, fields = fields.len(), rules = rules.len(), "extracted schema");

    Ok(Extraction {
        schema: Schema {
            name,
            ident: decl.name.clone(),
            module: decl.module.clone(),
            generics: decl.generics.clone(),
            visibility: decl.visibility,
            fields,
            rules,
        },
        diagnostics,
    })
}

// =============================================================================
// Fields
// =============================================================================

fn extract_field(
    schema: &str,
    field: &FieldDecl,
    index: &DomainTypeIndex,
    config: &ForgeConfig,
    diagnostics: &mut Diagnostics,
) -> Field {
    let kind = classify_field_type(&field.ty, index, config);
    let error_path = resolve_error_path(schema, field, diagnostics);
    let mutability = resolve_mutability(schema, field, diagnostics);

    debug!(schema, field = %field.name, ?kind, ?mutability, "classified field");

    Field {
        name: field.name.clone(),
        ty: field.ty.clone(),
        kind,
        error_path,
        mutability,
    }
}

/// Single when the type is schema-bearing, List when it is a list of
/// schema-bearing elements, None otherwise.
pub fn classify_field_type(ty: &TypeRef, index: &DomainTypeIndex, config: &ForgeConfig) -> DomainKind {
    if index.contains(ty) {
        return DomainKind::Single;
    }
    if config.types.is_list_type(&ty.path) {
        if let Some(element) = ty.sole_arg() {
            if index.contains(element) {
                return DomainKind::List;
            }
        }
    }
    DomainKind::None
}

fn resolve_error_path(schema: &str, field: &FieldDecl, diagnostics: &mut Diagnostics) -> Option<String> {
    match &field.rename {
        None => Some(field.name.clone()),
        Some(RenameArg::Literal(path)) => Some(path.clone()),
        Some(RenameArg::NoPath) => None,
        Some(RenameArg::Expr(source)) => {
            diagnostics.push(
                DiagnosticItem::new(
                    schema,
                    DiagnosticCode::InvalidRenameArgument,
                    "Argument must be a literal string or the no-path marker",
                )
                .at_member(&field.name)
                .with_context(format!("found `{}`; using field name", source)),
            );
            Some(field.name.clone())
        }
    }
}

/// The first set or init accessor decides; anything else is fixed.
fn resolve_mutability(schema: &str, field: &FieldDecl, diagnostics: &mut Diagnostics) -> Mutability {
    let Some(accessor) = field
        .accessors
        .iter()
        .find(|a| matches!(a.kind, AccessorKind::Set | AccessorKind::Init))
    else {
        return Mutability::None;
    };

    let (mutability, label) = match accessor.kind {
        AccessorKind::Init => (Mutability::InitOnce, "Init"),
        _ => (Mutability::Settable, "Setter"),
    };

    if accessor.visibility != Visibility::Private {
        diagnostics.report(
            schema,
            &field.name,
            DiagnosticCode::NonPrivateMutator,
            format!("{} should be private in domain objects", label),
        );
    }

    mutability
}

// =============================================================================
// Rules
// =============================================================================

fn extract_rule(schema: &str, method: &MethodDecl, diagnostics: &mut Diagnostics) -> Option<ValidationRule> {
    let mut valid = true;

    if method.receiver != Receiver::None {
        diagnostics.report(
            schema,
            &method.name,
            DiagnosticCode::ImpureValidationRule,
            "Validation rule must be an associated function without a self receiver",
        );
        valid = false;
    }

    let returns = classify_return_shape(method.returns.as_ref());
    if returns.is_none() {
        let found = method
            .returns
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "()".to_string());
        diagnostics.push(
            DiagnosticItem::new(
                schema,
                DiagnosticCode::InvalidRuleReturnShape,
                "Return type of a validation rule must be a sequence of DomainError or of messages",
            )
            .at_member(&method.name)
            .with_context(format!("found `{}`", found)),
        );
        valid = false;
    }

    if method.params.is_empty() {
        diagnostics.report(
            schema,
            &method.name,
            DiagnosticCode::ParameterlessRule,
            "Validation rule must receive at least one parameter",
        );
        valid = false;
    }

    match (valid, returns) {
        (true, Some(returns)) => Some(ValidationRule {
            name: method.name.clone(),
            params: method.params.clone(),
            returns,
        }),
        _ => None,
    }
}

/// Recognise the return shapes a rule may have, optionally wrapped in `Option`.
pub fn classify_return_shape(ty: Option<&TypeRef>) -> Option<ReturnShape> {
    let mut ty = ty?;
    if ty.base_name() == "Option" {
        ty = ty.sole_arg()?;
    }

    if ty.base_name() == "RuleOutcome" {
        return Some(ReturnShape::Outcome);
    }

    if ty.base_name() != "Vec" {
        return None;
    }
    let element = ty.sole_arg()?;
    match element.path.as_str() {
        "&str" | "&'static str" => Some(ReturnShape::Messages),
        _ if element.base_name() == "String" => Some(ReturnShape::Messages),
        _ if element.base_name() == "DomainError" => Some(ReturnShape::Errors),
        _ => None,
    }
}
