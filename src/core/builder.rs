//! Builder for loading ReleaseConfig instances.

use crate::core::ConfigLoader;
use crate::core::discovery::{self, DiscoveredDescriptor};
use crate::error::{ConfigError, Result, ValidationError};
use crate::model::ReleaseConfig;
use crate::model::raw::{self, RawReleaseConfig};
use crate::sources::{ConfigSource, EnvSource, FileSource, Format, StringSource};
use std::path::{Path, PathBuf};

/// Type alias for caller-supplied validator functions.
type Validator = Box<dyn Fn(&ReleaseConfig) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// A document added through the builder, kept in call order.
enum Document {
    File(PathBuf),
    Discovered(PathBuf),
    Inline(String, Format),
}

/// Builder for loading a `ReleaseConfig`.
///
/// Provides a fluent interface for configuring all aspects of descriptor loading.
///
/// # Examples
///
/// ```rust,no_run
/// use versionrc::prelude::*;
///
/// # fn example() -> Result<()> {
/// let config = ReleaseConfig::builder()
///     .with_discovery(".")
///     .with_env_overrides("VERSIONRC", "__")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ReleaseConfigBuilder {
    documents: Vec<Document>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
    validators: Vec<Validator>,
}

impl ReleaseConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Add a file source with automatic format detection.
    ///
    /// Supported formats: JSON (.json and the bare .versionrc), YAML
    /// (.yaml, .yml), TOML (.toml)
    ///
    /// Documents are added in the order they are specified. Later documents
    /// have higher priority and will override earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.push(Document::File(path.into()));
        self
    }

    /// Add the descriptor found in `dir` (see [`crate::core::discovery`]).
    ///
    /// Discovery runs during [`ReleaseConfigBuilder::build`]; finding nothing
    /// fails the build.
    pub fn with_discovery(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents.push(Document::Discovered(dir.into()));
        self
    }

    /// Add an in-memory document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versionrc::prelude::*;
    ///
    /// let config = ReleaseConfig::builder()
    ///     .with_str(
    ///         r#"{
    ///             "preMajor": false,
    ///             "issueUrlFormat": "https://github.com/keptn/keptn/issues/{{id}}",
    ///             "types": [{"type": "feat", "section": "Features"}]
    ///         }"#,
    ///         Format::Json,
    ///     )
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.visible_sections(), vec!["Features"]);
    /// ```
    pub fn with_str(mut self, content: impl Into<String>, format: Format) -> Self {
        self.documents.push(Document::Inline(content.into(), format));
        self
    }

    /// Add environment variable source with custom prefix.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "VERSIONRC")
    /// * `separator` - Separator for nested keys (e.g., "__" for VERSIONRC_SCRIPTS__PRETAG)
    ///
    /// Environment variables have the highest priority by default (300).
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom descriptor source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Add a validation function that must pass, on top of the built-in
    /// invariants, before the descriptor is handed out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versionrc::prelude::*;
    ///
    /// let result = ReleaseConfig::builder()
    ///     .with_str(
    ///         r#"{
    ///             "preMajor": false,
    ///             "issueUrlFormat": "https://github.com/keptn/keptn/issues/{{id}}",
    ///             "types": [{"type": "feat", "section": "Features"}]
    ///         }"#,
    ///         Format::Json,
    ///     )
    ///     .with_validation(|config: &ReleaseConfig| {
    ///         if config.scripts().postchangelog().is_none() {
    ///             return Err(ValidationError::missing_field("scripts.postchangelog"));
    ///         }
    ///         Ok(())
    ///     })
    ///     .build();
    /// assert!(result.is_err());
    /// ```
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ReleaseConfig) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Load, merge and validate the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Discovery finds nothing
    /// - A source cannot be read or parsed
    /// - Deserialization fails
    /// - Validation fails, built-in or custom
    pub fn build(self) -> Result<ReleaseConfig> {
        let mut loader = ConfigLoader::new();

        // Add documents with increasing priority
        for (index, document) in self.documents.into_iter().enumerate() {
            let priority = 100 + (index as i32 * 10); // 100, 110, 120, etc.
            let source: Box<dyn ConfigSource> = match document {
                Document::File(path) => Box::new(FileSource::new(path).with_priority(priority)),
                Document::Discovered(dir) => {
                    let DiscoveredDescriptor { path, format, .. } =
                        discovery::discover(None, &dir)?;
                    Box::new(
                        FileSource::new(path)
                            .with_format(format)
                            .with_priority(priority),
                    )
                }
                Document::Inline(content, format) => Box::new(
                    StringSource::new(content, format)
                        .with_name(format!("inline#{}", index))
                        .with_priority(priority),
                ),
            };
            loader.add_source(source);
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        // Add environment variable source (highest priority)
        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix, separator)));
        }

        let merged = loader.merge()?;
        let mut errors = raw::check_value_kinds(&merged);
        let config = match ConfigLoader::deserialize_merged::<RawReleaseConfig>(merged) {
            Ok(document) => match ReleaseConfig::try_from(document) {
                Ok(config) if errors.is_empty() => config,
                Ok(_) => return Err(collected(errors)),
                Err(invalid) => {
                    errors.extend(invalid.flatten());
                    return Err(collected(errors));
                }
            },
            // A mistyped field explains the failure better than the deserializer
            Err(_) if !errors.is_empty() => return Err(collected(errors)),
            Err(e) => return Err(e),
        };

        let custom: Vec<ValidationError> = self
            .validators
            .iter()
            .filter_map(|validator| validator(&config).err())
            .collect();
        ValidationError::from_errors(custom)?;

        tracing::info!(
            sources = ?loader.source_names(),
            types = config.types().len(),
            hidden = config.hidden_types().count(),
            pre_major = config.pre_major(),
            "loaded release descriptor"
        );

        Ok(config)
    }
}

fn collected(mut errors: Vec<ValidationError>) -> ConfigError {
    if errors.len() == 1 {
        errors.remove(0).into()
    } else {
        ValidationError::Multiple(errors).into()
    }
}

impl Default for ReleaseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseConfig {
    /// Create a new builder for loading a descriptor.
    pub fn builder() -> ReleaseConfigBuilder {
        ReleaseConfigBuilder::new()
    }

    /// Load and validate the descriptor in `path`.
    ///
    /// # Errors
    ///
    /// See [`ReleaseConfigBuilder::build`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().with_file(path.as_ref()).build()
    }

    /// Locate the descriptor for the project in `dir` and load it.
    ///
    /// # Errors
    ///
    /// See [`ReleaseConfigBuilder::build`].
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder().with_discovery(dir.as_ref()).build()
    }
}

impl std::str::FromStr for ReleaseConfig {
    type Err = ConfigError;

    /// Parse a JSON descriptor.
    fn from_str(s: &str) -> Result<Self> {
        Self::builder().with_str(s, Format::Json).build()
    }
}
