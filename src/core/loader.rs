//! Descriptor loader that merges multiple sources.

use crate::error::{ConfigError, Result};
use crate::sources::ConfigSource;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Loads and merges descriptor documents from multiple sources.
///
/// The loader handles precedence by sorting sources by priority and merging them
/// in order (lower priority first, higher priority sources override).
/// Tables merge key by key, everything else (including arrays such as
/// `types`) is replaced whole. Keys match case-insensitively and keep the
/// spelling of the source that introduced them.
pub struct ConfigLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigLoader {
    /// Create a new descriptor loader.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a descriptor source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Sources ordered lowest priority first; ties keep insertion order.
    fn sorted_sources(&self) -> Vec<&dyn ConfigSource> {
        let mut sorted: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }

    /// Merge every source into a single map of top-level keys.
    ///
    /// # Errors
    ///
    /// Returns an error if no source was added or any source fails to load.
    pub fn merge(&self) -> Result<HashMap<String, config::Value>> {
        if self.sources.is_empty() {
            return Err(ConfigError::LoadError(
                "No configuration sources specified".to_string(),
            ));
        }

        let mut merged = HashMap::new();
        for source in self.sorted_sources() {
            let values = source.load().map_err(|e| {
                ConfigError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            tracing::debug!(
                source = %source.name(),
                priority = source.priority(),
                keys = values.len(),
                "merging descriptor source"
            );

            for (key, value) in values {
                merge_into(&mut merged, key, value);
            }
        }

        Ok(merged)
    }

    /// Load and merge all sources, then deserialize the result.
    ///
    /// # Type Parameters
    ///
    /// * `T` - The target document type
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any source fails to load
    /// - Deserialization fails
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Self::deserialize_merged(self.merge()?)
    }

    /// Deserialize a map produced by [`ConfigLoader::merge`].
    ///
    /// Keys are taken as they are, so names that are not valid `config` path
    /// expressions (`$schema`) are simply unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DeserializationError`] if the map does not fit `T`.
    pub fn deserialize_merged<T>(merged: HashMap<String, config::Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        config::Value::from(merged).try_deserialize::<T>().map_err(|e| {
            ConfigError::DeserializationError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted_sources().iter().map(|s| s.name()).collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `value` under `key`, merging with an entry whose key differs only
/// in case.
fn merge_into(target: &mut HashMap<String, config::Value>, key: String, value: config::Value) {
    let existing = target
        .keys()
        .find(|existing| existing.eq_ignore_ascii_case(&key))
        .cloned();

    match existing.and_then(|existing| target.remove_entry(&existing)) {
        Some((existing, base)) => {
            target.insert(existing, merge_value(base, value));
        }
        None => {
            target.insert(key, value);
        }
    }
}

fn merge_value(base: config::Value, overlay: config::Value) -> config::Value {
    match (base.clone().into_table(), overlay.clone().into_table()) {
        (Ok(base_table), Ok(overlay_table)) => {
            let mut merged: HashMap<String, config::Value> = base_table.into_iter().collect();
            for (key, value) in overlay_table {
                merge_into(&mut merged, key, value);
            }
            config::Value::from(merged)
        }
        _ => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ConfigSource;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestScripts {
        postchangelog: Option<String>,
        pretag: Option<String>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestConfig {
        #[serde(rename = "preMajor", alias = "premajor")]
        pre_major: bool,
        scripts: TestScripts,
        types: Vec<String>,
    }

    struct MockSource {
        name: String,
        priority: i32,
        values: HashMap<String, config::Value>,
    }

    impl MockSource {
        fn new(name: &str, priority: i32) -> Self {
            Self {
                name: name.to_string(),
                priority,
                values: HashMap::new(),
            }
        }

        fn with_value(mut self, key: &str, value: impl Into<config::Value>) -> Self {
            self.values.insert(key.to_string(), value.into());
            self
        }
    }

    impl ConfigSource for MockSource {
        fn load(&self) -> Result<HashMap<String, config::Value>> {
            Ok(self.values.clone())
        }

        fn name(&self) -> String {
            self.name.clone()
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn scripts(pairs: &[(&str, &str)]) -> config::Value {
        let table: HashMap<String, config::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), config::Value::from(*v)))
            .collect();
        config::Value::from(table)
    }

    fn types(names: &[&str]) -> config::Value {
        config::Value::from(
            names
                .iter()
                .map(|n| config::Value::from(*n))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_empty_loader() {
        let loader = ConfigLoader::new();
        let result: Result<TestConfig> = loader.load();
        assert!(result.is_err());
    }

    #[test]
    fn test_single_source() {
        let mut loader = ConfigLoader::new();
        let source = MockSource::new("test", 100)
            .with_value("preMajor", true)
            .with_value("scripts", scripts(&[("postchangelog", "./post.sh")]))
            .with_value("types", types(&["feat", "fix"]));
        loader.add_source(Box::new(source));

        let config: TestConfig = loader.load().unwrap();
        assert!(config.pre_major);
        assert_eq!(config.scripts.postchangelog.as_deref(), Some("./post.sh"));
        assert_eq!(config.types, vec!["feat", "fix"]);
    }

    #[test]
    fn test_precedence_and_deep_merge() {
        let mut loader = ConfigLoader::new();

        let base = MockSource::new("file", 100)
            .with_value("preMajor", true)
            .with_value("scripts", scripts(&[("postchangelog", "./post.sh")]))
            .with_value("types", types(&["feat", "fix", "chore"]));

        // Lower-cased key, as produced by environment variables
        let overrides = MockSource::new("env", 300)
            .with_value("premajor", false)
            .with_value("scripts", scripts(&[("pretag", "make check")]))
            .with_value("types", types(&["docs"]));

        loader.add_source(Box::new(overrides));
        loader.add_source(Box::new(base));

        let config: TestConfig = loader.load().unwrap();
        assert!(!config.pre_major); // Overridden
        assert_eq!(config.scripts.postchangelog.as_deref(), Some("./post.sh")); // Kept
        assert_eq!(config.scripts.pretag.as_deref(), Some("make check")); // Added
        assert_eq!(config.types, vec!["docs"]); // Arrays are replaced whole
    }

    #[test]
    fn test_merge_keeps_first_spelling() {
        let mut loader = ConfigLoader::new();
        loader.add_source(Box::new(MockSource::new("a", 100).with_value("preMajor", true)));
        loader.add_source(Box::new(MockSource::new("b", 200).with_value("PREMAJOR", false)));

        let merged = loader.merge().unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged.contains_key("preMajor"));
    }

    #[test]
    fn test_failing_source_is_named() {
        struct Broken;
        impl ConfigSource for Broken {
            fn load(&self) -> Result<HashMap<String, config::Value>> {
                Err(ConfigError::ParseError("bad".into()))
            }
            fn name(&self) -> String {
                "broken".into()
            }
        }

        let mut loader = ConfigLoader::new();
        loader.add_source(Box::new(Broken));
        let err = loader.merge().unwrap_err();
        assert!(err.to_string().contains("'broken'"));
    }

    #[test]
    fn test_keys_that_are_not_paths() {
        let mut loader = ConfigLoader::new();
        let source = MockSource::new("test", 100)
            .with_value("$schema", "https://json.schemastore.org/versionrc")
            .with_value("skip bump", true)
            .with_value("preMajor", false)
            .with_value("scripts", scripts(&[]))
            .with_value("types", types(&["feat"]));
        loader.add_source(Box::new(source));

        let config: TestConfig = loader.load().unwrap();
        assert!(!config.pre_major);
        assert_eq!(config.types, vec!["feat"]);
    }

    #[test]
    fn test_source_names() {
        let mut loader = ConfigLoader::new();
        loader.add_source(Box::new(MockSource::new("source1", 100)));
        loader.add_source(Box::new(MockSource::new("source2", 200)));
        loader.add_source(Box::new(MockSource::new("source3", 50)));
        loader.add_source(Box::new(MockSource::new("source4", 100)));

        let names = loader.source_names();
        // Sorted by priority, ties in insertion order
        assert_eq!(names, vec!["source3", "source1", "source4", "source2"]);
    }
}
