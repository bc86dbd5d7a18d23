//! Compiles `schemas/*.json` into `$OUT_DIR/<module>.domain.rs`.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use domain_forge::{compile, DeclarationGraph, ForgeConfig};

fn main() -> anyhow::Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let schemas = manifest_dir.join("schemas");
    println!("cargo:rerun-if-changed={}", schemas.display());

    let graph = DeclarationGraph::from_directory(&schemas).context("loading demo schemas")?;
    let output = compile(&graph, &ForgeConfig::default());
    if output.diagnostics.has_errors() {
        bail!("domain schemas have errors:\n{}", output.diagnostics);
    }
    for warning in output.diagnostics.warnings() {
        println!("cargo:warning={}", warning);
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    output.write_to(&out_dir)?;
    Ok(())
}
