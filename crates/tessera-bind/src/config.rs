//! Binder configuration.
//!
//! [`BindConfig`] holds the settings a [`Binder`](crate::Binder) is built
//! from. [`BindConfigLoader`] layers them: built-in defaults, then a TOML or
//! JSON document, then environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::body::DEFAULT_MAX_BODY_BYTES;

/// What happens when no source supplies a tagged parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// Fail the binding with a missing-value error.
    #[default]
    Strict,
    /// Leave the field as decoded from the body and continue.
    Lenient,
}

impl MissingValuePolicy {
    /// Policy name as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValuePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ConfigError::invalid_value(
                "missing_value",
                format!("expected 'strict' or 'lenient', got '{s}'"),
            )),
        }
    }
}

/// Binder settings.
///
/// # Example
///
/// ```rust
/// use tessera_bind::{BindConfig, MissingValuePolicy};
///
/// let config: BindConfig = toml::from_str(r#"
///     missing_value = "lenient"
///     sources = ["query", "path-variables"]
/// "#).unwrap();
///
/// assert_eq!(config.missing_value, MissingValuePolicy::Lenient);
/// assert_eq!(config.max_body_bytes, 1024 * 1024);
/// assert_eq!(config.sources, vec!["query", "path-variables"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindConfig {
    /// Behavior for tagged parameters no source supplies.
    pub missing_value: MissingValuePolicy,

    /// Largest body, in bytes, the decoder accepts.
    pub max_body_bytes: usize,

    /// Source tokens in precedence order.
    pub sources: Vec<String>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            missing_value: MissingValuePolicy::Strict,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            sources: Vec::new(),
        }
    }
}

impl BindConfig {
    /// Checks the settings for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `max_body_bytes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "max_body_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading a [`BindConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported document format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an environment parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

/// Layered loader for [`BindConfig`].
///
/// Later layers override earlier ones:
/// 1. Default values
/// 2. A TOML or JSON document (file or string)
/// 3. Environment variables `PREFIX__MISSING_VALUE`, `PREFIX__MAX_BODY_BYTES`
///    and `PREFIX__SOURCES` (comma separated)
///
/// # Example
///
/// ```rust
/// use tessera_bind::{BindConfigLoader, MissingValuePolicy};
///
/// let config = BindConfigLoader::new()
///     .with_string(r#"{"missing_value": "lenient", "max_body_bytes": 4096}"#, "json")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// assert_eq!(config.missing_value, MissingValuePolicy::Lenient);
/// assert_eq!(config.max_body_bytes, 4096);
/// ```
#[derive(Debug, Default)]
pub struct BindConfigLoader {
    config: BindConfig,
    env_prefix: Option<String>,
}

impl BindConfigLoader {
    /// Creates a loader holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, not `.toml`/`.json`, or
    /// does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse_document(&content, &format)?;
        Ok(self)
    }

    /// Loads a configuration file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in `format` (`"toml"` or `"json"`).
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse_document(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Enables environment overrides under `prefix`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates the result.
    pub fn load(mut self) -> Result<BindConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(key, _)| key.starts_with(&prefix))
                .collect();
            self.apply_vars(&prefix, vars)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> BindConfig {
        self.config
    }

    fn apply_vars<I>(&mut self, prefix: &str, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            self.apply_var(prefix, &key, &value)?;
        }
        Ok(())
    }

    fn apply_var(&mut self, prefix: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(name) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };

        match name {
            "MISSING_VALUE" => {
                self.config.missing_value = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected 'strict' or 'lenient'"))?;
            }
            "MAX_BODY_BYTES" => {
                self.config.max_body_bytes = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            "SOURCES" => {
                self.config.sources = value
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => tracing::debug!(var = key, "ignoring unknown configuration variable"),
        }
        Ok(())
    }
}

fn parse_document(content: &str, format: &str) -> Result<BindConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}
