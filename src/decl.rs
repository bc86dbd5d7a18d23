//! Declaration Graph
//!
//! The already-parsed, type-resolved view of the host crate that the compiler
//! consumes. Produced by a front end and stored as JSON:
//!
//! ```json
//! {
//!   "types": [{
//!     "name": "Pair",
//!     "module": "shapes",
//!     "domain": true,
//!     "members": [
//!       { "field": { "name": "a", "ty": { "path": "i32" },
//!                    "accessors": [{ "kind": "set" }] } },
//!       { "method": { "name": "a_less_than_b", "validation": true,
//!                     "params": [{ "name": "a", "ty": { "path": "i32" } }],
//!                     "returns": { "path": "Vec", "args": [{ "path": "String" }] } } }
//!     ]
//!   }]
//! }
//! ```
//!
//! Types are fully qualified as they must appear in generated code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ForgeError, Result};

// =============================================================================
// Type References
// =============================================================================

/// A resolved type: a path plus generic arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            path: path.into(),
            args,
        }
    }

    /// Last path segment (`crate::a::Pair` -> `Pair`)
    pub fn base_name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Single generic argument, if this is a one-parameter type
    pub fn sole_arg(&self) -> Option<&TypeRef> {
        match self.args.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

// =============================================================================
// Members
// =============================================================================

/// Declared visibility of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Crate,
    Public,
}

impl Visibility {
    /// Rust visibility prefix for emitted items
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Private => "",
            Self::Crate => "pub(crate) ",
            Self::Public => "pub ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

/// A get/set/init accessor declared on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Argument given to the rename marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameArg {
    /// A literal string path segment
    Literal(String),
    /// Explicit "no path": errors on this field are root-level
    NoPath,
    /// Anything else (const reference, expression); carries the source text
    Expr(String),
}

/// How a method receives `self`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    /// Associated function, no instance state
    #[default]
    None,
    Ref,
    RefMut,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<RenameArg>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// Carries the validation-rule marker
    #[serde(default)]
    pub validation: bool,
    #[serde(default)]
    pub receiver: Receiver,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
}

/// A member of a type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
}

// =============================================================================
// Type Declarations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Module path relative to the crate root; `None` is the root itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Full path for declarations outside this crate (`::money::Currency`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Carries the domain-object marker
    #[serde(default)]
    pub domain: bool,
    /// Whether generated items may be added to this type
    #[serde(default = "default_true")]
    pub extensible: bool,
    /// Enclosing declaration, for nested declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Trait paths this type implements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

fn default_true() -> bool {
    true
}

impl TypeDecl {
    /// Fully qualified path (`crate::shapes::Pair`)
    pub fn qualified_name(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match &self.module {
            Some(module) if !module.is_empty() => format!("crate::{}::{}", module, self.name),
            _ => format!("crate::{}", self.name),
        }
    }

    /// Name with generic parameters (`Pair<T>`)
    pub fn display_name(&self) -> String {
        if self.generics.is_empty() {
            self.name.clone()
        } else {
            format!("{}<{}>", self.name, self.generics.join(", "))
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Field(f) => Some(f),
            MemberDecl::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Method(m) => Some(m),
            MemberDecl::Field(_) => None,
        })
    }

    pub fn implements_trait(&self, capability: &str) -> bool {
        self.implements
            .iter()
            .any(|t| t == capability || t.rsplit("::").next() == Some(capability))
    }
}

// =============================================================================
// Graph
// =============================================================================

/// All declarations visible to one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationGraph {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl DeclarationGraph {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ForgeError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every `*.json` file under `dir`, merged in path order
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| e.path().extension().map(|ext| ext == "json").unwrap_or(false))
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        let mut graph = Self::default();
        for path in paths {
            graph.merge(Self::from_path(&path)?);
        }
        Ok(graph)
    }

    /// Load a list of inputs; directories are walked, files are read directly
    pub fn load(inputs: &[PathBuf]) -> Result<Self> {
        let mut graph = Self::default();
        for input in inputs {
            let part = if input.is_dir() {
                Self::from_directory(input)?
            } else {
                Self::from_path(input)?
            };
            graph.merge(part);
        }
        Ok(graph)
    }

    pub fn merge(&mut self, other: DeclarationGraph) {
        self.types.extend(other.types);
    }

    /// Declarations carrying the domain-object marker, in declaration order
    pub fn domain_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter().filter(|t| t.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::generic(
            "Vec",
            vec![TypeRef::named("crate::numbers::PositiveInt")],
        );
        assert_eq!(ty.to_string(), "Vec<crate::numbers::PositiveInt>");
        assert_eq!(ty.base_name(), "Vec");
        assert_eq!(TypeRef::named("crate::numbers::PositiveInt").base_name(), "PositiveInt");
    }

    #[test]
    fn test_parse_minimal_graph() {
        let graph = DeclarationGraph::from_json_str(
            r#"{
                "types": [{
                    "name": "PositiveInt",
                    "module": "numbers",
                    "domain": true,
                    "members": [
                        { "field": { "name": "value", "ty": { "path": "i32" },
                                     "rename": "no_path",
                                     "accessors": [{ "kind": "init" }] } },
                        { "method": { "name": "value_is_positive", "validation": true,
                                      "params": [{ "name": "value", "ty": { "path": "i32" } }],
                                      "returns": { "path": "Vec", "args": [{ "path": "String" }] } } }
                    ]
                }]
            }"#,
        )
        .unwrap();

        let decl = &graph.types[0];
        assert!(decl.extensible);
        assert_eq!(decl.qualified_name(), "crate::numbers::PositiveInt");
        let field = decl.fields().next().unwrap();
        assert_eq!(field.rename, Some(RenameArg::NoPath));
        assert_eq!(field.accessors[0].visibility, Visibility::Private);
        let method = decl.methods().next().unwrap();
        assert_eq!(method.receiver, Receiver::None);
        assert_eq!(method.returns.as_ref().unwrap().to_string(), "Vec<String>");
    }

    #[test]
    fn test_rename_literal_and_expr() {
        let lit: RenameArg = serde_json::from_str(r#"{ "literal": "OtherName" }"#).unwrap();
        assert_eq!(lit, RenameArg::Literal("OtherName".to_string()));
        let expr: RenameArg = serde_json::from_str(r#"{ "expr": "NAME_CONST" }"#).unwrap();
        assert_eq!(expr, RenameArg::Expr("NAME_CONST".to_string()));
    }

    #[test]
    fn test_root_module_qualified_name() {
        let graph = DeclarationGraph::from_json_str(
            r#"{ "types": [{ "name": "Money", "generics": ["C"] }] }"#,
        )
        .unwrap();
        assert_eq!(graph.types[0].qualified_name(), "crate::Money");
        assert_eq!(graph.types[0].display_name(), "Money<C>");
        assert_eq!(graph.domain_types().count(), 0);
    }
}
