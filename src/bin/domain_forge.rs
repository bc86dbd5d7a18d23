//! Domain Forge CLI
//!
//! Analyses declaration graphs and generates validated constructors and
//! mutators for every domain object.
//!
//! Usage:
//!   domain-forge check schemas/
//!   domain-forge generate schemas/ --out src/generated
//!   domain-forge verify schemas/ --out src/generated
//!   domain-forge graph schemas/ --output nesting.dot

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use domain_forge::analysis::{analyze, NestingGraph};
use domain_forge::drift::{self, DriftStatus};
use domain_forge::{compile, DeclarationGraph, ForgeConfig};

#[derive(Parser)]
#[command(name = "domain-forge")]
#[command(about = "Compile domain object schemas into validated constructors and mutators")]
#[command(version)]
struct Cli {
    /// Configuration file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse schemas and report diagnostics
    Check {
        /// Declaration graph files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Generate one unit per module
    Generate {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory (defaults to `output.dir` from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Fail if generated units on disk differ from fresh output
    Verify {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export the nesting graph as DOT
    Graph {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print each schema's field -> rules dependency index
    Index {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let config = ForgeConfig::load_from(config_path.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Check { inputs } => {
            let graph = load(&inputs)?;
            let analysis = analyze(&graph, &config);

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&analysis.diagnostics)?),
                Format::Text => {
                    print!("{}", analysis.diagnostics);
                    println!("{} schema(s) ready for emission", analysis.schemas.len());
                }
            }
            Ok(!analysis.failed(&config))
        }

        Commands::Generate { inputs, out } => {
            let graph = load(&inputs)?;
            let output = compile(&graph, &config);
            eprint!("{}", output.diagnostics);

            let dir = out.unwrap_or_else(|| config.output.dir.clone());
            let written = output.write_to(&dir)?;
            for path in &written {
                println!("{}", path.display());
            }
            Ok(!output.failed(&config))
        }

        Commands::Verify { inputs, out } => {
            let graph = load(&inputs)?;
            let output = compile(&graph, &config);
            let dir = out.unwrap_or_else(|| config.output.dir.clone());
            let report = drift::verify(&output, &dir)?;

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Text => {
                    for entry in &report.entries {
                        let file = entry.file.display();
                        match &entry.status {
                            DriftStatus::UpToDate => println!("ok       {}", file),
                            DriftStatus::Missing => println!("missing  {}", file),
                            DriftStatus::Orphaned => println!("orphaned {}", file),
                            DriftStatus::Stale {
                                added,
                                removed,
                                hand_edited,
                                diff,
                            } => {
                                let note = if *hand_edited { ", edited by hand" } else { "" };
                                println!("stale    {} (+{} -{}{})", file, added, removed, note);
                                print!("{}", diff);
                            }
                        }
                    }
                }
            }
            Ok(!report.has_drift())
        }

        Commands::Graph { inputs, output } => {
            let graph = load(&inputs)?;
            let analysis = analyze(&graph, &config);
            let dot = NestingGraph::build(&analysis.schemas).to_dot();

            match output {
                Some(path) => {
                    std::fs::write(&path, &dot).with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("Exported DOT to: {}", path.display());
                }
                None => print!("{}", dot),
            }
            Ok(true)
        }

        Commands::Index { inputs } => {
            let graph = load(&inputs)?;
            let analysis = analyze(&graph, &config);

            for bound in &analysis.schemas {
                println!("{}", bound.schema.name);
                for field in &bound.schema.fields {
                    let rules: Vec<&str> = bound.rules_for(&field.name).map(|r| r.name.as_str()).collect();
                    println!("  {:<20} {}", field.name, rules.join(", "));
                }
            }
            Ok(!analysis.failed(&config))
        }
    }
}

fn load(inputs: &[PathBuf]) -> anyhow::Result<DeclarationGraph> {
    DeclarationGraph::load(inputs).context("loading declaration graph")
}
