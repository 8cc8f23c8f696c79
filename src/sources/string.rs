//! In-memory document source.

use super::{ConfigSource, Format};
use crate::error::{ConfigError, Result};
use config::File;
use std::collections::HashMap;

/// Parse `content` as a `format` document into a map of top-level keys.
pub(crate) fn parse_document(
    content: &str,
    format: Format,
    origin: &str,
) -> Result<HashMap<String, config::Value>> {
    let parsed = config::Config::builder()
        .add_source(File::from_str(content, format.file_format()))
        .build()
        .map_err(|e| ConfigError::ParseError(format!("{} ({}): {}", origin, format, e)))?;

    parsed
        .try_deserialize::<HashMap<String, config::Value>>()
        .map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to parse {}: {}", origin, e))
        })
}

/// A descriptor document held in memory.
///
/// # Examples
///
/// ```rust
/// use versionrc::sources::{ConfigSource, Format, StringSource};
///
/// let source = StringSource::new(r#"{"preMajor": true}"#, Format::Json);
/// assert!(source.load().is_ok());
/// ```
pub struct StringSource {
    content: String,
    format: Format,
    name: String,
    priority: i32,
}

impl StringSource {
    /// Create a source over `content` parsed as `format`.
    pub fn new(content: impl Into<String>, format: Format) -> Self {
        Self {
            content: content.into(),
            format,
            name: "inline".to_string(),
            priority: 100,
        }
    }

    /// Name shown in logs and errors.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for StringSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        parse_document(&self.content, self.format, &self.name())
    }

    fn name(&self) -> String {
        format!("{}:{}", self.format, self.name)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json() {
        let source = StringSource::new(
            r#"{"preMajor": true, "types": [{"type": "feat", "section": "Features"}]}"#,
            Format::Json,
        );
        let map = source.load().unwrap();
        assert!(map.contains_key("types"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_load_yaml() {
        let source = StringSource::new(
            "preMajor: false\ntypes:\n  - type: ci\n    hidden: true\n",
            Format::Yaml,
        );
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn test_load_toml() {
        let source = StringSource::new(
            "preMajor = true\n\n[[types]]\ntype = \"feat\"\nsection = \"Features\"\n",
            Format::Toml,
        );
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_document() {
        let source = StringSource::new(r#"{"preMajor": "#, Format::Json);
        assert!(matches!(source.load(), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_name_and_priority() {
        let source = StringSource::new("{}", Format::Json)
            .with_name("defaults")
            .with_priority(50);
        assert_eq!(source.name(), "json:defaults");
        assert_eq!(source.priority(), 50);
    }
}
