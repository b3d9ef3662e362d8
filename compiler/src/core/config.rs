use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::CONFIG_FILE_NAME;
use crate::data::sql::Backend;
use crate::data::statement::DEFAULT_PARAMETER_PREFIX;

// =============================================================================
// File Configuration (JSON)
// =============================================================================

/// Contents of `sieve.json`
///
/// Every key is optional; CLI flags and environment variables take
/// precedence over values found here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub dialect: Option<Backend>,
    pub parameter_prefix: Option<String>,
    /// Relative paths are resolved against the config file's directory
    pub schema: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");

        if let Some(schema) = config.schema.take() {
            config.schema = Some(resolve_relative(path, &schema).display().to_string());
        }
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Resolved configuration: defaults -> file config -> CLI/env overrides
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dialect: Backend,
    pub parameter_prefix: String,
    pub schema: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dialect: Backend::default(),
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
            schema: None,
        }
    }
}

impl AppConfig {
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        // 1. Load from CLI-specified path OR local directory
        let config_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match config_path {
            Some(path) => {
                let loaded = FileConfig::load_from_file(&path)?;
                loaded.warn_unknown_fields();
                tracing::debug!(path = %path.display(), "Config file loaded");
                loaded
            }
            None => FileConfig::default(),
        };

        // 2. Layer configs: defaults -> file config -> CLI/env overrides
        let dialect = cli.dialect.or(file_config.dialect).unwrap_or_default();

        let parameter_prefix = cli
            .param_prefix
            .clone()
            .or(file_config.parameter_prefix)
            .unwrap_or_else(|| DEFAULT_PARAMETER_PREFIX.to_string());

        let schema = cli
            .schema
            .clone()
            .or_else(|| file_config.schema.map(PathBuf::from));

        let config = Self {
            dialect,
            parameter_prefix,
            schema,
        };
        config.validate()?;

        tracing::debug!(
            dialect = %config.dialect,
            prefix = %config.parameter_prefix,
            schema = ?config.schema,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.parameter_prefix) {
            anyhow::bail!(
                "Invalid parameter prefix '{}': must be a non-empty ASCII identifier",
                self.parameter_prefix
            );
        }
        Ok(())
    }

    /// Schema catalog path, required for compiling requests
    pub fn schema_path(&self) -> Result<&Path> {
        self.schema
            .as_deref()
            .context("No schema catalog configured (use --schema, SIEVE_SCHEMA or sieve.json)")
    }
}

/// Resolve `value` against the directory containing `config_path`
fn resolve_relative(config_path: &Path, value: &str) -> PathBuf {
    let candidate = PathBuf::from(value);
    if candidate.is_absolute() {
        return candidate;
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(candidate),
        _ => candidate,
    }
}

/// ASCII letter or underscore, then letters, digits or underscores
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
