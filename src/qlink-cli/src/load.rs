//! Schema loading and resolution.

use std::path::Path;

use log::{debug, info};

use common_config::{ConfigFormat, QlinkConfig, RegistryConfig};
use common_error::QlinkResult;
use qlink_core::{NamedTypeRegistry, Schema};

/// Parse an unresolved schema from text.
pub fn load_schema_str(text: &str, format: ConfigFormat) -> QlinkResult<Schema> {
    let schema = match format {
        ConfigFormat::Json => serde_json::from_str(text)?,
        ConfigFormat::Toml => toml::from_str(text)?,
        ConfigFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(schema)
}

/// Read an unresolved schema from a file.
///
/// Without an explicit `format`, the file extension decides.
pub fn load_schema_file(
    path: impl AsRef<Path>,
    format: Option<ConfigFormat>,
) -> QlinkResult<Schema> {
    let path = path.as_ref();
    let format = match format {
        Some(format) => format,
        None => ConfigFormat::from_path(path)?,
    };
    debug!("loading schema {} as {format}", path.display());
    let text = std::fs::read_to_string(path)?;
    load_schema_str(&text, format)
}

/// Build the type registry described by `config`, plus `extra` names.
pub fn build_registry<I, S>(config: &RegistryConfig, extra: I) -> NamedTypeRegistry
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut registry = if config.builtin_types {
        NamedTypeRegistry::builtin()
    } else {
        NamedTypeRegistry::new()
    };
    registry.extend(config.types.iter().cloned());
    registry.extend(extra);
    debug!("type registry holds {} names", registry.len());
    registry
}

/// Load and resolve a schema file.
///
/// `format` overrides `config.loader.format`, which overrides the file
/// extension. `extra_types` are registered on top of the configured ones.
pub fn check_file(
    path: impl AsRef<Path>,
    config: &QlinkConfig,
    format: Option<ConfigFormat>,
    extra_types: &[String],
) -> QlinkResult<Schema> {
    let path = path.as_ref();
    let mut schema = load_schema_file(path, format.or(config.loader.format))?;
    let registry = build_registry(&config.registry, extra_types.iter().cloned());
    schema.prepare(&registry)?;
    info!("{} resolved", path.display());
    Ok(schema)
}
