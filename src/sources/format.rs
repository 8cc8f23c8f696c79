//! Document formats understood by the loader.

use std::fmt;
use std::path::Path;

/// File name of the extensionless descriptor, which holds JSON.
const BARE_DESCRIPTOR_NAME: &str = ".versionrc";

/// A descriptor document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON (`.json`, and the bare `.versionrc`)
    Json,
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// TOML (`.toml`)
    Toml,
}

impl Format {
    /// Detect the format of `path` from its extension.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versionrc::sources::Format;
    ///
    /// assert_eq!(Format::from_path(".versionrc"), Some(Format::Json));
    /// assert_eq!(Format::from_path("release/.versionrc.yml"), Some(Format::Yaml));
    /// assert_eq!(Format::from_path("notes.txt"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.file_name().and_then(|name| name.to_str()) == Some(BARE_DESCRIPTOR_NAME) {
            return Some(Self::Json);
        }
        match path.extension().and_then(|ext| ext.to_str())? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub(crate) fn file_format(self) -> config::FileFormat {
        match self {
            Self::Json => config::FileFormat::Json,
            Self::Yaml => config::FileFormat::Yaml,
            Self::Toml => config::FileFormat::Toml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Toml => write!(f, "toml"),
        }
    }
}
