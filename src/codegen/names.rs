//! Naming helpers for emitted code
//!
//! Field and rule names arrive exactly as declared. Anything that is a Rust
//! keyword must be written as a raw identifier in generated source.

use crate::config::ForgeConfig;

/// File name of the unit for a module (`shapes::geo` -> `shapes.geo.domain.rs`).
///
/// The crate root maps to `crate.domain.rs`; `crate` is a keyword, so no
/// module path can collide with it.
pub fn unit_file_name(module: Option<&str>) -> String {
    match module {
        Some(module) if !module.is_empty() => format!("{}.domain.rs", module.replace("::", ".")),
        _ => "crate.domain.rs".to_string(),
    }
}

/// Identifier as it must appear in source
pub fn ident(name: &str) -> String {
    if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Setter for a field; the prefix makes keywords safe
pub fn setter(config: &ForgeConfig, field: &str) -> String {
    ident(&config.setter_name(field))
}

/// `Some("path")` or `None` literal for an optional error path
pub fn path_literal(path: Option<&str>) -> String {
    match path {
        Some(path) => format!("::core::option::Option::Some({:?})", path),
        None => "::core::option::Option::None".to_string(),
    }
}

// =============================================================================
// Keywords
// =============================================================================

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "static", "struct",
    "trait", "true", "type", "unsafe", "use", "where", "while",
    "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_file_name() {
        assert_eq!(unit_file_name(None), "crate.domain.rs");
        assert_eq!(unit_file_name(Some("")), "crate.domain.rs");
        assert_eq!(unit_file_name(Some("lib")), "lib.domain.rs");
        assert_eq!(unit_file_name(Some("shapes")), "shapes.domain.rs");
        assert_eq!(unit_file_name(Some("shapes::geo")), "shapes.geo.domain.rs");
    }

    #[test]
    fn test_keyword_escape() {
        assert_eq!(ident("type"), "r#type");
        assert_eq!(ident("value"), "value");
        assert_eq!(setter(&ForgeConfig::default(), "type"), "set_type");
    }

    #[test]
    fn test_path_literal_escapes() {
        assert_eq!(path_literal(Some("a/b")), "::core::option::Option::Some(\"a/b\")");
        assert_eq!(path_literal(Some("say \"hi\"")), "::core::option::Option::Some(\"say \\\"hi\\\"\")");
        assert_eq!(path_literal(None), "::core::option::Option::None");
    }
}
