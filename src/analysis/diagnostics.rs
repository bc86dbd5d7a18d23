//! Diagnostics
//!
//! Collects warnings and errors during extraction and binding.
//! Diagnostics never reach generated code; they decide whether a schema is
//! emitted at all.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // === Structural ===
    /// Declaration cannot receive generated items
    NonExtensibleDeclaration,
    /// Declaration is nested inside another declaration
    NestedDeclaration,
    /// Two domain declarations share a qualified name
    DuplicateSchema,

    // === Binding ===
    /// Rule parameter type differs from the field type
    TypeMismatch,
    /// Rule parameter names no field
    MemberNotFound,

    // === Members ===
    /// Set/init accessor is not private
    NonPrivateMutator,
    /// Validation rule captures instance state
    ImpureValidationRule,
    /// Validation rule returns neither errors nor messages
    InvalidRuleReturnShape,
    /// Validation rule has no parameters
    ParameterlessRule,
    /// Rename marker argument is not a literal string or "no path"
    InvalidRenameArgument,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonExtensibleDeclaration => "DF001",
            Self::NestedDeclaration => "DF002",
            Self::DuplicateSchema => "DF003",
            Self::TypeMismatch => "DF004",
            Self::MemberNotFound => "DF005",
            Self::NonPrivateMutator => "DF006",
            Self::ImpureValidationRule => "DF007",
            Self::InvalidRuleReturnShape => "DF008",
            Self::ParameterlessRule => "DF009",
            Self::InvalidRenameArgument => "DF010",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NonExtensibleDeclaration => "Non-extensible declaration",
            Self::NestedDeclaration => "Nested declaration",
            Self::DuplicateSchema => "Duplicate schema",
            Self::TypeMismatch => "Type mismatch",
            Self::MemberNotFound => "Member not found",
            Self::NonPrivateMutator => "Non-private mutator",
            Self::ImpureValidationRule => "Impure validation rule",
            Self::InvalidRuleReturnShape => "Invalid rule return shape",
            Self::ParameterlessRule => "Parameterless rule",
            Self::InvalidRenameArgument => "Invalid rename argument",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::NonPrivateMutator => Severity::Warning,

            Self::NonExtensibleDeclaration
            | Self::NestedDeclaration
            | Self::DuplicateSchema
            | Self::TypeMismatch
            | Self::MemberNotFound
            | Self::ImpureValidationRule
            | Self::InvalidRuleReturnShape
            | Self::ParameterlessRule
            | Self::InvalidRenameArgument => Severity::Error,
        }
    }

    /// Whether this diagnostic prevents any code being emitted for the schema.
    ///
    /// A type mismatch only drops the offending rule; an invalid rename falls
    /// back to the field name.
    pub fn blocks_schema(&self) -> bool {
        !matches!(
            self,
            Self::NonPrivateMutator | Self::TypeMismatch | Self::InvalidRenameArgument
        )
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Qualified name of the schema that caused this diagnostic
    pub schema: String,
    /// Member (field, rule, or `rule(param)`) the diagnostic points at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(schema: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            member: None,
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn at_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {} ({}", self.code, self.code.severity(), self.message, self.schema)?;
        if let Some(member) = &self.member {
            write!(f, "::{}", member)?;
        }
        write!(f, ")")?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from analysis passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    /// Add a diagnostic pointing at a member of a schema
    pub fn report(
        &mut self,
        schema: impl Into<String>,
        member: impl Into<String>,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) {
        self.push(DiagnosticItem::new(schema, code, message).at_member(member));
    }

    /// Add an unresolved-member diagnostic with an optional suggestion
    pub fn member_not_found(
        &mut self,
        schema: impl Into<String>,
        rule: &str,
        param: &str,
        suggestion: Option<&str>,
    ) {
        let mut item = DiagnosticItem::new(
            schema,
            DiagnosticCode::MemberNotFound,
            format!("Member {} could not be resolved", param),
        )
        .at_member(format!("{}({})", rule, param));
        if let Some(suggestion) = suggestion {
            item = item.with_context(format!("did you mean `{}`?", suggestion));
        }
        self.push(item);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity() == Severity::Error)
    }

    /// Whether any diagnostic for `schema` blocks its emission
    pub fn blocks(&self, schema: &str) -> bool {
        self.items
            .iter()
            .any(|i| i.schema == schema && i.code.blocks_schema() && i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.code == code)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if self.has_errors() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                self.error_count(),
                self.warning_count()
            ));
        } else if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
