use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ConsistencyPolicy;

const SCHEMA_FILE_NAME: &str = "gxp-provision.schema.json";
const BUNDLED_SCHEMA: &str = include_str!("../gxp-provision.schema.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub descriptor: DescriptorConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Descriptor file to load; the bundled descriptor is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub strict_consistency: bool,
}

impl DescriptorConfig {
    pub fn consistency_policy(&self) -> ConsistencyPolicy {
        if self.strict_consistency {
            ConsistencyPolicy::Strict
        } else {
            ConsistencyPolicy::Warn
        }
    }
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// Timezone name to POSIX TZ string, merged over the built-in table.
    #[serde(default)]
    pub timezones: BTreeMap<String, String>,
    /// Locale to phone language code, merged over the built-in table.
    #[serde(default)]
    pub locales: BTreeMap<String, String>,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            timezones: BTreeMap::new(),
            locales: BTreeMap::new(),
        }
    }
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_stderr_level() -> StderrLevel {
    StderrLevel::Warn
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StderrLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling JSON log; file logging is off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_stderr_level")]
    pub stderr_level: StderrLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_level: default_stderr_level(),
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = resolve_schema(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if let Some(path) = &mut config.descriptor.path
            && !path.is_absolute()
        {
            *path = config_base.join(&*path);
        }
        if let Some(dir) = &mut config.logging.dir
            && !dir.is_absolute()
        {
            *dir = config_base.join(&*dir);
        }

        Ok(config)
    }

    /// Loads `config_path` when given; otherwise the default file if present, else defaults.
    pub fn load_or_default(config_path: Option<&Path>, default_path: &Path) -> Result<Self> {
        match config_path {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }
}

fn resolve_schema(config_base: &Path, config_value: &Value) -> Result<Value> {
    let schema_path = match config_value.get("$schema").and_then(|value| value.as_str()) {
        Some(path_text) => {
            let configured = PathBuf::from(path_text);
            Some(if configured.is_absolute() {
                configured
            } else {
                config_base.join(configured)
            })
        }
        None => Some(config_base.join(SCHEMA_FILE_NAME)).filter(|path| path.exists()),
    };

    let Some(schema_path) = schema_path else {
        return serde_json::from_str(BUNDLED_SCHEMA).context("failed to parse bundled schema");
    };
    let schema_content = fs::read_to_string(&schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))
}

fn validate_against_schema(config_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| format!("{}: {}", error.instance_path, error))
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
