//! Code Generation
//!
//! Runs the analysis pipeline and emits one compilation unit per module.
//!
//! Architecture:
//! - [`crate::analysis`] decides which schemas are emitted and with which rules
//! - [`rust`] renders one bound schema
//! - this module groups rendered schemas by module and adds the header
//!
//! Emitters never look at the declaration graph, only at bound schemas.

pub mod names;
pub mod rust;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::analysis::{analyze, Analysis, Diagnostics};
use crate::checksum::Fingerprint;
use crate::config::ForgeConfig;
use crate::decl::DeclarationGraph;
use crate::error::{ForgeError, Result};

// =============================================================================
// Generated Output
// =============================================================================

/// Generated source for every schema declared in one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Module path relative to the crate root; `None` is the root
    pub module: Option<String>,
    pub file_name: String,
    /// Complete file content, header included
    pub code: String,
    /// Qualified names of the schemas in this unit
    pub schemas: Vec<String>,
}

/// Output from code generation
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub units: Vec<GeneratedUnit>,
    pub diagnostics: Diagnostics,
}

impl GeneratedOutput {
    pub fn unit(&self, module: Option<&str>) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.module.as_deref() == module)
    }

    pub fn schema_count(&self) -> usize {
        self.units.iter().map(|u| u.schemas.len()).sum()
    }

    /// Same rule as [`Analysis::failed`]
    pub fn failed(&self, config: &ForgeConfig) -> bool {
        self.diagnostics.has_errors()
            || (config.diagnostics.warnings_as_errors && self.diagnostics.warning_count() > 0)
    }

    /// Write every unit into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = dir.join(&unit.file_name);
            fs::write(&path, &unit.code)?;
            debug!(path = %path.display(), "Wrote generated unit");
            written.push(path);
        }
        info!(units = written.len(), dir = %dir.display(), "Generated units written");
        Ok(written)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Analyse `graph` and emit every schema that survived analysis
pub fn compile(graph: &DeclarationGraph, config: &ForgeConfig) -> GeneratedOutput {
    let analysis = analyze(graph, config);
    let units = generate(&analysis, config);
    GeneratedOutput {
        units,
        diagnostics: analysis.diagnostics,
    }
}

/// Like [`compile`], but any error diagnostic fails the whole run
pub fn compile_strict(graph: &DeclarationGraph, config: &ForgeConfig) -> Result<GeneratedOutput> {
    let analysis = analyze(graph, config);
    if analysis.failed(config) {
        return Err(ForgeError::Analysis(analysis.diagnostics));
    }
    let units = generate(&analysis, config);
    Ok(GeneratedOutput {
        units,
        diagnostics: analysis.diagnostics,
    })
}

/// Emit the bound schemas of an analysis, grouped by module in order of
/// first appearance
pub fn generate(analysis: &Analysis, config: &ForgeConfig) -> Vec<GeneratedUnit> {
    let mut groups: Vec<(Option<String>, Vec<String>, Vec<String>)> = Vec::new();

    for bound in &analysis.schemas {
        let module = bound.schema.module.clone().filter(|m| !m.is_empty());
        let code = rust::emit_schema(bound, config);
        match groups.iter_mut().find(|(m, _, _)| *m == module) {
            Some((_, names, bodies)) => {
                names.push(bound.schema.name.clone());
                bodies.push(code);
            }
            None => groups.push((module, vec![bound.schema.name.clone()], vec![code])),
        }
    }

    groups
        .into_iter()
        .map(|(module, schemas, bodies)| {
            let body = bodies.join("\n");
            let code = if config.output.header {
                format!("{}\n{}", header(&body), body)
            } else {
                body
            };
            GeneratedUnit {
                file_name: names::unit_file_name(module.as_deref()),
                module,
                code,
                schemas,
            }
        })
        .collect()
}

fn header(body: &str) -> String {
    let mut output = String::new();
    output.push_str("// @generated by domain-forge. DO NOT EDIT.\n");
    output.push_str("// Regenerate with `domain-forge generate`.\n");
    output.push_str(&format!("{}\n", Fingerprint::of(body).header_line()));
    output
}
