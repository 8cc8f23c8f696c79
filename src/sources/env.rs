//! Environment variable descriptor source.

use super::ConfigSource;
use crate::error::Result;
use config::Environment;
use std::collections::HashMap;

/// Prefix used when none is given.
pub const DEFAULT_ENV_PREFIX: &str = "VERSIONRC";

/// Environment variable descriptor source.
///
/// Loads overrides from environment variables with a specified prefix and
/// separator for nested keys. Variable names are case-insensitive; the
/// loader matches them to the camelCase document keys.
///
/// # Examples
///
/// ```rust
/// use versionrc::sources::EnvSource;
///
/// // VERSIONRC_PREMAJOR=false            -> preMajor = false
/// // VERSIONRC_SCRIPTS__POSTCHANGELOG=x  -> scripts.postchangelog = "x"
/// let source = EnvSource::new("VERSIONRC", "__");
/// ```
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvSource {
    /// Create a new environment variable source.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "VERSIONRC")
    /// * `separator` - Separator for nested keys (e.g., "__" for VERSIONRC_SCRIPTS__PRETAG)
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300, // Env vars have highest priority by default
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX, "__")
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .try_parsing(true); // Try to parse booleans

        let config_builder = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                crate::error::ConfigError::LoadError(format!(
                    "Failed to load environment variables: {}",
                    e
                ))
            })?;

        let map = config_builder
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                crate::error::ConfigError::DeserializationError(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })?;

        Ok(map)
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
