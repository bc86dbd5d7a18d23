//! Golden-style tests for the analysis and synthesis pipeline
//!
//! Runs the compiler over fixture graphs and the demo schemas and checks the
//! diagnostics and emitted code.

use std::path::{Path, PathBuf};

use rstest::rstest;

use domain_forge::analysis::{analyze, DiagnosticCode, NestingGraph, Severity};
use domain_forge::schema::{DomainKind, Mutability};
use domain_forge::{compile, DeclarationGraph, ForgeConfig, Fingerprint};

fn root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn fixture(name: &str) -> PathBuf {
    root().join("tests/fixtures").join(name)
}

fn demo_graph() -> DeclarationGraph {
    DeclarationGraph::from_directory(&root().join("demo/schemas")).unwrap()
}

fn diagnostics_graph() -> DeclarationGraph {
    DeclarationGraph::from_path(&fixture("diagnostics.json")).unwrap()
}

// =============================================================================
// Diagnostics
// =============================================================================

#[rstest]
#[case("crate::broken::Sealed", DiagnosticCode::NonExtensibleDeclaration)]
#[case("crate::broken::Inner", DiagnosticCode::NestedDeclaration)]
#[case("crate::broken::Twice", DiagnosticCode::DuplicateSchema)]
#[case("crate::broken::Typo", DiagnosticCode::MemberNotFound)]
#[case("crate::broken::Stateful", DiagnosticCode::ImpureValidationRule)]
#[case("crate::broken::Boolean", DiagnosticCode::InvalidRuleReturnShape)]
#[case("crate::broken::Nullary", DiagnosticCode::ParameterlessRule)]
#[case("crate::lenient::Lenient", DiagnosticCode::NonPrivateMutator)]
#[case("crate::lenient::Lenient", DiagnosticCode::InvalidRenameArgument)]
#[case("crate::lenient::Lenient", DiagnosticCode::TypeMismatch)]
fn test_fixture_reports_code(#[case] schema: &str, #[case] code: DiagnosticCode) {
    let analysis = analyze(&diagnostics_graph(), &ForgeConfig::default());
    assert!(
        analysis.diagnostics.with_code(code).any(|d| d.schema == schema),
        "expected {} for {}\n{}",
        code,
        schema,
        analysis.diagnostics
    );
}

#[test]
fn test_only_unblocked_schemas_survive() {
    let analysis = analyze(&diagnostics_graph(), &ForgeConfig::default());
    let names: Vec<_> = analysis.schemas.iter().map(|b| b.schema.name.as_str()).collect();
    assert_eq!(names, vec!["crate::broken::Twice", "crate::lenient::Lenient"]);
    assert_eq!(analysis.diagnostics.warning_count(), 1);
    assert_eq!(
        analysis.diagnostics.warnings().next().unwrap().severity(),
        Severity::Warning
    );
}

#[test]
fn test_member_not_found_suggests_field() {
    let analysis = analyze(&diagnostics_graph(), &ForgeConfig::default());
    let item = analysis
        .diagnostics
        .with_code(DiagnosticCode::MemberNotFound)
        .next()
        .unwrap();
    assert_eq!(item.member.as_deref(), Some("amount_is_even(amout)"));
    assert_eq!(item.context, vec!["did you mean `amount`?".to_string()]);
}

#[test]
fn test_non_blocking_errors_still_emit() {
    let output = compile(&diagnostics_graph(), &ForgeConfig::default());
    let code = &output.unit(Some("lenient")).unwrap().code;

    // mismatched rule is dropped, the other one kept
    assert!(!code.contains("count_matches_wide"));
    assert!(code.contains("Self::count_is_small(&count)"));
    // invalid rename falls back to the field name
    assert!(code.contains("name: String,"));
    assert!(output.diagnostics.has_errors());
}

#[test]
fn test_diagnostics_serialize_to_json() {
    let analysis = analyze(&diagnostics_graph(), &ForgeConfig::default());
    let json = serde_json::to_value(&analysis.diagnostics).unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), analysis.diagnostics.len());
    assert!(items.iter().any(|i| i["code"] == "MemberNotFound"));
}

// =============================================================================
// Demo schemas
// =============================================================================

#[test]
fn test_demo_schemas_are_clean() {
    let analysis = analyze(&demo_graph(), &ForgeConfig::default());
    assert!(analysis.diagnostics.is_empty(), "{}", analysis.diagnostics);
    assert_eq!(analysis.schemas.len(), 7);
    // the hand-written capability type is indexed but not emitted
    assert_eq!(analysis.index.len(), 8);
}

#[test]
fn test_demo_field_classification() {
    let analysis = analyze(&demo_graph(), &ForgeConfig::default());
    let batch = &analysis.schema("crate::shapes::Batch").unwrap().schema;

    let items = batch.field("items").unwrap();
    assert_eq!(items.kind, DomainKind::List);
    assert_eq!(items.error_path.as_deref(), Some("Numbers"));
    assert_eq!(batch.field("label").unwrap().mutability, Mutability::InitOnce);
    assert_eq!(batch.field("revision").unwrap().mutability, Mutability::None);

    let price = &analysis.schema("crate::shapes::Price").unwrap().schema;
    assert_eq!(price.field("currency").unwrap().kind, DomainKind::Single);
}

#[test]
fn test_demo_dependency_index() {
    let analysis = analyze(&demo_graph(), &ForgeConfig::default());
    let pair = analysis.schema("crate::shapes::Pair").unwrap();
    let for_b: Vec<_> = pair.rules_for("b").map(|r| r.name.as_str()).collect();
    assert_eq!(for_b, vec!["a_less_than_b"]);

    let positive = analysis.schema("crate::numbers::PositiveInt").unwrap();
    let for_value: Vec<_> = positive.rules_for("value").map(|r| r.name.as_str()).collect();
    assert_eq!(for_value, vec!["value_is_not_zero", "value_is_not_negative"]);
}

#[test]
fn test_demo_units() {
    let output = compile(&demo_graph(), &ForgeConfig::default());
    let files: Vec<_> = output.units.iter().map(|u| u.file_name.as_str()).collect();
    assert_eq!(files, vec!["crate.domain.rs", "numbers.domain.rs", "shapes.domain.rs"]);

    for unit in &output.units {
        let (recorded, body) = Fingerprint::read_header(&unit.code).unwrap();
        assert!(recorded.verify(body), "{}", unit.file_name);
    }
}

#[test]
fn test_demo_pair_emission() {
    let output = compile(&demo_graph(), &ForgeConfig::default());
    let code = &output.unit(Some("shapes")).unwrap().code;

    assert!(code.contains("impl ::domain_forge_runtime::DomainObject for Pair {"));
    assert!(code.contains(
        "        let Some(b) = b else {\n            return ::domain_forge_runtime::DomainResult::Failure(__errors);\n        };"
    ));
    assert!(code.contains(
        "::domain_forge_runtime::check(&mut __errors, ::core::option::Option::Some(\"a\"), Self::a_less_than_b(&a, &b));"
    ));
    assert!(code.contains("pub fn set_b(&mut self, b: ::domain_forge_runtime::DomainResult<crate::numbers::PositiveInt>)"));
}

#[test]
fn test_demo_multiple_nested_fields_short_circuit_together() {
    let output = compile(&demo_graph(), &ForgeConfig::default());
    let code = &output.unit(Some("shapes")).unwrap().code;
    assert!(code.contains("let (Some(amount), Some(currency)) = (amount, currency) else {"));
}

#[test]
fn test_demo_nesting_graph() {
    let analysis = analyze(&demo_graph(), &ForgeConfig::default());
    let nesting = NestingGraph::build(&analysis.schemas);
    let into_positive: Vec<_> = nesting
        .dependents("crate::numbers::PositiveInt")
        .into_iter()
        .map(|(schema, edge)| format!("{}.{}", schema, edge.field))
        .collect();
    assert_eq!(
        into_positive,
        vec!["crate::shapes::Price.amount", "crate::shapes::Pair.b", "crate::shapes::Batch.items"]
    );
}

#[test]
fn test_custom_naming_flows_into_output() {
    let mut config = ForgeConfig::default();
    config.naming.constructor = "create".to_string();
    config.naming.setter_prefix = "with_".to_string();
    config.runtime.crate_path = "::forge_rt".to_string();

    let output = compile(&demo_graph(), &config);
    let code = &output.unit(Some("shapes")).unwrap().code;
    assert!(code.contains("pub fn create("));
    assert!(code.contains("pub fn with_a(&mut self, a: i32)"));
    assert!(code.contains("impl ::forge_rt::DomainObject for Pair {"));
}
