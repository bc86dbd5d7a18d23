//! Rust Code Emitter
//!
//! Turns a bound schema into the items added to its declaration:
//! - a `DomainObject` impl providing `to_result`
//! - an inherent impl with the validating constructor and one mutator per
//!   settable field
//!
//! The emitter only reads the bound model. Every classification decision has
//! already been made by the analysis pipeline.

use crate::analysis::BoundSchema;
use crate::config::ForgeConfig;
use crate::schema::{DomainKind, Field, Schema, ValidationRule};

use super::names::{ident, path_literal, setter};

/// Accumulator local in emitted bodies
const ERRORS: &str = "__errors";

// =============================================================================
// Public API
// =============================================================================

/// Emit every item generated for one schema
pub fn emit_schema(bound: &BoundSchema, config: &ForgeConfig) -> String {
    let schema = &bound.schema;
    let rt = Runtime::new(config);
    let mut output = String::new();

    output.push_str(&format!("// {}\n", schema.name));
    emit_capability(&mut output, schema, config, &rt);
    output.push('\n');

    output.push_str(&format!("impl{} {} {{\n", impl_generics(schema), schema.self_type()));
    emit_constructor(&mut output, schema, config, &rt);
    for field in schema.settable_fields() {
        output.push('\n');
        emit_setter(&mut output, bound, field, config, &rt);
    }
    output.push_str("}\n");

    output
}

/// Fully qualified runtime items, resolved once per schema
struct Runtime {
    capability: String,
    result: String,
    error: String,
    exception: String,
    nested: String,
    nested_list: String,
    check: String,
}

impl Runtime {
    fn new(config: &ForgeConfig) -> Self {
        let rt = &config.runtime;
        Self {
            capability: rt.item(&rt.capability),
            result: rt.item("DomainResult"),
            error: rt.item("DomainError"),
            exception: rt.item("DomainException"),
            nested: rt.item("nested"),
            nested_list: rt.item("nested_list"),
            check: rt.item("check"),
        }
    }
}

fn impl_generics(schema: &Schema) -> String {
    if schema.generics.is_empty() {
        String::new()
    } else {
        format!("<{}>", schema.generics.join(", "))
    }
}

// =============================================================================
// Capability
// =============================================================================

fn emit_capability(output: &mut String, schema: &Schema, config: &ForgeConfig, rt: &Runtime) {
    output.push_str(&format!(
        "impl{} {} for {} {{\n",
        impl_generics(schema),
        rt.capability,
        schema.self_type()
    ));
    output.push_str(&format!(
        "    fn {}(self) -> {}<Self> {{\n",
        config.naming.to_result, rt.result
    ));
    output.push_str(&format!("        {}::Success(self)\n", rt.result));
    output.push_str("    }\n");
    output.push_str("}\n");
}

// =============================================================================
// Constructor
// =============================================================================

fn parameter_type(field: &Field, rt: &Runtime) -> String {
    match field.kind {
        DomainKind::None => field.ty.to_string(),
        DomainKind::Single => format!("{}<{}>", rt.result, field.ty),
        DomainKind::List => format!(
            "impl ::core::iter::IntoIterator<Item = {}<{}>>",
            rt.result,
            field.domain_type()
        ),
    }
}

/// `let x = nested(&mut errors, path, x);` for a domain-kind field
fn aggregation(field: &Field, rt: &Runtime) -> String {
    let helper = match field.kind {
        DomainKind::List => &rt.nested_list,
        _ => &rt.nested,
    };
    let name = ident(&field.name);
    format!(
        "{}(&mut {}, {}, {})",
        helper,
        ERRORS,
        path_literal(field.error_path.as_deref()),
        name
    )
}

fn emit_constructor(output: &mut String, schema: &Schema, config: &ForgeConfig, rt: &Runtime) {
    let params: Vec<&Field> = schema.parameters().collect();
    let nested: Vec<&Field> = params.iter().copied().filter(|f| f.is_domain()).collect();

    output.push_str(&format!(
        "    {}fn {}(",
        schema.visibility.keyword(),
        config.naming.constructor
    ));
    if params.is_empty() {
        output.push_str(&format!(") -> {}<Self> {{\n", rt.result));
    } else {
        output.push('\n');
        for field in &params {
            output.push_str(&format!(
                "        {}: {},\n",
                ident(&field.name),
                parameter_type(field, rt)
            ));
        }
        output.push_str(&format!("    ) -> {}<Self> {{\n", rt.result));
    }

    let validates = !nested.is_empty() || !schema.rules.is_empty();
    if validates {
        output.push_str(&format!(
            "        let mut {}: ::std::vec::Vec<{}> = ::std::vec::Vec::new();\n",
            ERRORS, rt.error
        ));
    }

    // Phase 1: nested aggregation, short-circuiting before any rule runs
    if !nested.is_empty() {
        for field in &nested {
            output.push_str(&format!(
                "        let {} = {};\n",
                ident(&field.name),
                aggregation(field, rt)
            ));
        }
        let names: Vec<String> = nested.iter().map(|f| ident(&f.name)).collect();
        let (pattern, scrutinee) = if names.len() == 1 {
            (format!("Some({})", names[0]), names[0].clone())
        } else {
            (
                format!(
                    "({})",
                    names
                        .iter()
                        .map(|n| format!("Some({})", n))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                format!("({})", names.join(", ")),
            )
        };
        output.push_str(&format!("        let {} = {} else {{\n", pattern, scrutinee));
        output.push_str(&format!("            return {}::Failure({});\n", rt.result, ERRORS));
        output.push_str("        };\n");
    }

    for field in schema.fields.iter().filter(|f| !f.is_parameter()) {
        output.push_str(&format!(
            "        let {}: {} = ::core::default::Default::default();\n",
            ident(&field.name),
            field.ty
        ));
    }

    // Phase 2: every rule, in declaration order
    for rule in &schema.rules {
        output.push_str(&format!(
            "        {}(&mut {}, {}, Self::{}({}));\n",
            rt.check,
            ERRORS,
            path_literal(first_param_path(schema, rule)),
            ident(&rule.name),
            rule.params
                .iter()
                .map(|p| format!("&{}", ident(&p.name)))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if validates {
        output.push_str(&format!("        if !{}.is_empty() {{\n", ERRORS));
        output.push_str(&format!("            return {}::Failure({});\n", rt.result, ERRORS));
        output.push_str("        }\n");
    }

    let fields: Vec<String> = schema.fields.iter().map(|f| ident(&f.name)).collect();
    if fields.is_empty() {
        output.push_str(&format!("        {}::Success(Self {{}})\n", rt.result));
    } else {
        output.push_str(&format!(
            "        {}::Success(Self {{ {} }})\n",
            rt.result,
            fields.join(", ")
        ));
    }
    output.push_str("    }\n");
}

/// Plain messages from a rule land on its first parameter's field
fn first_param_path<'a>(schema: &'a Schema, rule: &ValidationRule) -> Option<&'a str> {
    rule.first_param()
        .and_then(|p| schema.field(&p.name))
        .and_then(|f| f.error_path.as_deref())
}

// =============================================================================
// Mutators
// =============================================================================

fn emit_setter(output: &mut String, bound: &BoundSchema, field: &Field, config: &ForgeConfig, rt: &Runtime) {
    let schema = &bound.schema;
    let name = ident(&field.name);
    let rules: Vec<&ValidationRule> = bound.rules_for(&field.name).collect();

    output.push_str(&format!(
        "    {}fn {}(&mut self, {}: {}) -> ::core::result::Result<(), {}> {{\n",
        schema.visibility.keyword(),
        setter(config, &field.name),
        name,
        parameter_type(field, rt),
        rt.exception
    ));

    if field.is_domain() || !rules.is_empty() {
        output.push_str(&format!(
            "        let mut {}: ::std::vec::Vec<{}> = ::std::vec::Vec::new();\n",
            ERRORS, rt.error
        ));
    }

    if field.is_domain() {
        output.push_str(&format!("        let Some({}) = {} else {{\n", name, aggregation(field, rt)));
        output.push_str(&format!(
            "            return ::core::result::Result::Err({}::new({}));\n",
            rt.exception, ERRORS
        ));
        output.push_str("        };\n");
    }

    for rule in &rules {
        let args: Vec<String> = rule
            .params
            .iter()
            .map(|p| {
                if p.name == field.name {
                    format!("&{}", name)
                } else {
                    format!("&self.{}", ident(&p.name))
                }
            })
            .collect();
        output.push_str(&format!(
            "        {}(&mut {}, {}, Self::{}({}));\n",
            rt.check,
            ERRORS,
            path_literal(first_param_path(schema, rule)),
            ident(&rule.name),
            args.join(", ")
        ));
    }

    if !rules.is_empty() {
        output.push_str(&format!("        if !{}.is_empty() {{\n", ERRORS));
        output.push_str(&format!(
            "            return ::core::result::Result::Err({}::new({}));\n",
            rt.exception, ERRORS
        ));
        output.push_str("        }\n");
    }

    output.push_str(&format!("        self.{} = {};\n", name, name));
    output.push_str("        ::core::result::Result::Ok(())\n");
    output.push_str("    }\n");
}
