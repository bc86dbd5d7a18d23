//! Configuration management for the schema compiler
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (domain-forge.toml)
//! - Environment variables (DOMAIN_FORGE__*)
//!
//! ## Example config file (domain-forge.toml):
//! ```toml
//! [runtime]
//! crate_path = "::domain_forge_runtime"
//! capability = "DomainObject"
//!
//! [naming]
//! constructor = "try_new"
//! to_result = "to_result"
//! setter_prefix = "set_"
//!
//! [types]
//! list_types = ["Vec", "std::vec::Vec"]
//!
//! [output]
//! dir = "generated"
//! header = true
//!
//! [diagnostics]
//! warnings_as_errors = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Main configuration for the compiler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub types: TypesConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Where generated code finds the runtime support types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path of the runtime crate as seen from generated code
    #[serde(default = "default_crate_path")]
    pub crate_path: String,

    /// Name of the domain-object capability trait
    #[serde(default = "default_capability")]
    pub capability: String,
}

/// Names of generated functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_constructor")]
    pub constructor: String,

    #[serde(default = "default_to_result")]
    pub to_result: String,

    #[serde(default = "default_setter_prefix")]
    pub setter_prefix: String,
}

/// Type recognition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypesConfig {
    /// Homogeneous ordered collections eligible for list-kind fields
    #[serde(default = "default_list_types")]
    pub list_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory generated units are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Emit the "do not edit" header with a fingerprint
    #[serde(default = "default_true")]
    pub header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Treat warnings as errors for exit status
    #[serde(default)]
    pub warnings_as_errors: bool,
}

// Default value functions
fn default_crate_path() -> String {
    "::domain_forge_runtime".to_string()
}

fn default_capability() -> String {
    "DomainObject".to_string()
}

fn default_constructor() -> String {
    "try_new".to_string()
}

fn default_to_result() -> String {
    "to_result".to_string()
}

fn default_setter_prefix() -> String {
    "set_".to_string()
}

fn default_list_types() -> Vec<String> {
    vec![
        "Vec".to_string(),
        "std::vec::Vec".to_string(),
        "alloc::vec::Vec".to_string(),
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            crate_path: default_crate_path(),
            capability: default_capability(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            constructor: default_constructor(),
            to_result: default_to_result(),
            setter_prefix: default_setter_prefix(),
        }
    }
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            list_types: default_list_types(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            header: true,
        }
    }
}

impl TypesConfig {
    pub fn is_list_type(&self, path: &str) -> bool {
        self.list_types.iter().any(|t| t == path)
    }
}

impl RuntimeConfig {
    /// Fully qualified path of a runtime item
    pub fn item(&self, name: &str) -> String {
        format!("{}::{}", self.crate_path, name)
    }
}

impl ForgeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "domain-forge.toml",
            ".domain-forge.toml",
            "config/domain-forge.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "domain-forge", "domain-forge") {
            let xdg_config = config_dir.config_dir().join("domain-forge.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("DOMAIN_FORGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Generated setter name for a field
    pub fn setter_name(&self, field: &str) -> String {
        format!("{}{}", self.naming.setter_prefix, field)
    }
}
