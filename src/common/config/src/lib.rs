//! Configuration management for qlink.
//!
//! Provides the loader, type registry, and display settings used by the
//! `qlink-check` tool. Every section has a `Default`, so a partial file only
//! needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use common_error::{ensure, QlinkError, QlinkResult};

/// Global qlink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QlinkConfig {
    /// Schema loader configuration.
    pub loader: LoaderConfig,
    /// Type registry configuration.
    pub registry: RegistryConfig,
    /// Output configuration.
    pub display: DisplayConfig,
}

impl QlinkConfig {
    /// Parse a configuration from text in the given format.
    pub fn from_str_with_format(text: &str, format: ConfigFormat) -> QlinkResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(text)?,
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check settings that deserialize fine but cannot be used.
    pub fn validate(&self) -> QlinkResult<()> {
        ensure!(
            self.display.max_condition_len > 3,
            "display.max_condition_len must leave room for an ellipsis"
        );
        ensure!(
            self.registry.types.iter().all(|t| !t.is_empty()),
            "registry.types must not contain empty names"
        );
        Ok(())
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> QlinkResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&text, format)
    }
}

/// Text format of a schema or configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// JSON.
    Json,
    /// TOML.
    Toml,
    /// YAML.
    Yaml,
}

impl ConfigFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> QlinkResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(QlinkError::invalid_parameter(format!(
                "cannot infer format of {}",
                path.display()
            ))),
        }
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = QlinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(QlinkError::invalid_parameter(format!(
                "unknown format: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Schema loader configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Format of schema files. Inferred from the extension when unset.
    pub format: Option<ConfigFormat>,
}

/// Type registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Register the built-in scalar type names.
    pub builtin_types: bool,
    /// Additional type names to register.
    pub types: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            builtin_types: true,
            types: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print the resolved schema as a tree.
    pub tree: bool,
    /// Maximum length of a condition string in tree output.
    pub max_condition_len: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tree: false,
            max_condition_len: 48,
        }
    }
}
