//! File-based descriptor source.

use super::string::parse_document;
use super::{ConfigSource, Format};
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based descriptor source.
///
/// Loads a descriptor from a YAML, TOML or JSON file. The format comes from
/// the file extension unless set explicitly; the bare `.versionrc` file is
/// JSON.
///
/// # Examples
///
/// ```rust,no_run
/// use versionrc::sources::{FileSource, Format};
///
/// let source = FileSource::new(".versionrc.yaml");
/// let legacy = FileSource::new("release.rc").with_format(Format::Json);
/// ```
pub struct FileSource {
    path: PathBuf,
    format: Option<Format>,
    priority: i32,
}

impl FileSource {
    /// Create a new file source with automatic format detection.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` and `.versionrc` -> JSON
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            priority: 100,
        }
    }

    /// Parse the file as `format` regardless of its extension.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the document format, explicit or detected.
    fn resolve_format(&self) -> Result<Format> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        Format::from_path(&self.path).ok_or_else(|| {
            ConfigError::LoadError(format!(
                "Unsupported file format: {}. Supported: .versionrc, .json, .yaml, .yml, .toml",
                self.path.display()
            ))
        })
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let format = self.resolve_format()?;

        if !self.path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path)?;
        parse_document(&content, format, &self.path.display().to_string())
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
