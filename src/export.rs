//! Re-serialization of descriptors.
//!
//! Output uses the document key spelling, keeps `types` in declaration
//! order and writes `hidden: true` only for hidden rules.

use crate::error::{ConfigError, Result};
use crate::model::ReleaseConfig;

impl ReleaseConfig {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializationError`] if serialization fails.
    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializationError`] if serialization fails.
    #[cfg(feature = "yaml")]
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializationError`] if serialization fails.
    #[cfg(feature = "toml")]
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lifecycle, Scripts, TypeRule};
    use crate::sources::Format;

    fn sample() -> ReleaseConfig {
        ReleaseConfig::from_parts(
            true,
            "https://github.com/keptn/keptn/issues/{{id}}",
            Scripts::new().with_hook(Lifecycle::Postchangelog, "./post.sh"),
            vec![
                TypeRule::visible("feat", "Features"),
                TypeRule::hidden("ci"),
                TypeRule::visible("fix", "Bug Fixes"),
            ],
        )
        .unwrap()
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_round_trip() {
        let config = sample();
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"preMajor\": true"));
        assert!(!json.contains("\"hidden\": false"));

        let reloaded = ReleaseConfig::builder()
            .with_str(json, Format::Json)
            .build()
            .unwrap();
        assert_eq!(reloaded, config);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_round_trip() {
        let config = sample();
        let yaml = config.to_yaml_string().unwrap();
        let reloaded = ReleaseConfig::builder()
            .with_str(yaml, Format::Yaml)
            .build()
            .unwrap();
        assert_eq!(reloaded, config);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_round_trip() {
        let config = sample();
        let toml = config.to_toml_string().unwrap();
        let reloaded = ReleaseConfig::builder()
            .with_str(toml, Format::Toml)
            .build()
            .unwrap();
        assert_eq!(reloaded, config);
    }
}
