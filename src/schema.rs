//! Schema model: fields and validation rules of one domain object
//!
//! Build-time only. Nothing here survives into generated code except through
//! the emitter.

use serde::{Deserialize, Serialize};

use crate::decl::{Param, TypeRef, Visibility};

/// Whether a field holds nested domain objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// Plain value
    None,
    /// A single nested domain object
    Single,
    /// An ordered list of nested domain objects
    List,
}

/// How a field may change after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Not a constructor parameter; default-initialised and never mutated
    None,
    /// Constructor parameter, no mutator
    InitOnce,
    /// Constructor parameter with a validating mutator
    Settable,
}

/// Declared return shape of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// Sequence of structured errors carrying their own paths
    Errors,
    /// Sequence of plain messages, attributed to the first parameter
    Messages,
    /// Already a rule outcome
    Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Declared type (`Vec<Inner>` for list fields)
    pub ty: TypeRef,
    pub kind: DomainKind,
    /// Path segment used for errors on this field; `None` means root-level
    pub error_path: Option<String>,
    pub mutability: Mutability,
}

impl Field {
    pub fn is_domain(&self) -> bool {
        self.kind != DomainKind::None
    }

    /// Constructor parameters are the init-once and settable fields
    pub fn is_parameter(&self) -> bool {
        self.mutability != Mutability::None
    }

    pub fn is_settable(&self) -> bool {
        self.mutability == Mutability::Settable
    }

    /// Type of the nested domain object (element type for lists)
    pub fn domain_type(&self) -> &TypeRef {
        match self.kind {
            DomainKind::List => self.ty.sole_arg().unwrap_or(&self.ty),
            DomainKind::Single | DomainKind::None => &self.ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: ReturnShape,
}

impl ValidationRule {
    /// Messages from this rule are attributed to the first parameter
    pub fn first_param(&self) -> Option<&Param> {
        self.params.first()
    }

    pub fn references(&self, field: &str) -> bool {
        self.params.iter().any(|p| p.name == field)
    }
}

/// Fields and rules of a single domain declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Qualified name (`crate::shapes::Pair`), unique per compilation
    pub name: String,
    /// Declared identifier (`Pair`)
    pub ident: String,
    pub module: Option<String>,
    pub generics: Vec<String>,
    pub visibility: Visibility,
    pub fields: Vec<Field>,
    pub rules: Vec<ValidationRule>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_parameter())
    }

    pub fn settable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_settable())
    }

    pub fn domain_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_domain())
    }

    /// `Pair` or `Pair<T>` as written in an impl header
    pub fn self_type(&self) -> String {
        if self.generics.is_empty() {
            self.ident.clone()
        } else {
            format!("{}<{}>", self.ident, self.generics.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: TypeRef, kind: DomainKind, mutability: Mutability) -> Field {
        Field {
            name: name.to_string(),
            ty,
            kind,
            error_path: Some(name.to_string()),
            mutability,
        }
    }

    #[test]
    fn test_list_domain_type_is_element() {
        let items = field(
            "items",
            TypeRef::generic("Vec", vec![TypeRef::named("crate::PositiveInt")]),
            DomainKind::List,
            Mutability::Settable,
        );
        assert_eq!(items.domain_type().to_string(), "crate::PositiveInt");
        assert!(items.is_domain());
    }

    #[test]
    fn test_parameters_skip_fixed_fields() {
        let schema = Schema {
            name: "crate::Pair".to_string(),
            ident: "Pair".to_string(),
            module: None,
            generics: vec!["T".to_string()],
            visibility: Visibility::Public,
            fields: vec![
                field("a", TypeRef::named("i32"), DomainKind::None, Mutability::Settable),
                field("b", TypeRef::named("i32"), DomainKind::None, Mutability::InitOnce),
                field("c", TypeRef::named("i32"), DomainKind::None, Mutability::None),
            ],
            rules: Vec::new(),
        };
        let names: Vec<_> = schema.parameters().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.settable_fields().count(), 1);
        assert_eq!(schema.self_type(), "Pair<T>");
    }
}
