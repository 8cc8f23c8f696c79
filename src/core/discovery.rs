//! Descriptor discovery.
//!
//! Resolution order: explicit path → `VERSIONRC_PATH` → well-known file
//! names in the project directory.

use crate::error::{ConfigError, Result};
use crate::sources::Format;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the descriptor file directly.
pub const ENV_DESCRIPTOR_PATH: &str = "VERSIONRC_PATH";

/// Descriptor file names probed in a directory, first match wins.
pub const DESCRIPTOR_FILE_NAMES: [&str; 5] = [
    ".versionrc",
    ".versionrc.json",
    ".versionrc.yaml",
    ".versionrc.yml",
    ".versionrc.toml",
];

/// JavaScript descriptor names, recognised only to explain why discovery
/// found nothing it can load.
pub const SCRIPT_DESCRIPTOR_FILE_NAMES: [&str; 2] = [".versionrc.js", ".versionrc.cjs"];

/// Where a descriptor was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorOrigin {
    /// Path given by the caller.
    Explicit,
    /// Path taken from [`ENV_DESCRIPTOR_PATH`].
    Environment,
    /// Well-known file name in the project directory.
    Directory,
}

impl fmt::Display for DescriptorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorOrigin::Explicit => write!(f, "explicit path"),
            DescriptorOrigin::Environment => write!(f, "environment variable"),
            DescriptorOrigin::Directory => write!(f, "project directory"),
        }
    }
}

/// A located descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDescriptor {
    /// Path of the descriptor.
    pub path: PathBuf,
    /// Format to parse it with.
    pub format: Format,
    /// How it was found.
    pub origin: DescriptorOrigin,
}

/// Locate the descriptor for the project in `dir`.
///
/// An explicit path must exist. A path from [`ENV_DESCRIPTOR_PATH`] that
/// does not exist is skipped with a warning.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] listing every probed path when nothing
/// is found, [`ConfigError::ScriptDescriptor`] when the directory only holds
/// a `.versionrc.js`, or a load error when a file has no recognisable format.
pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<DiscoveredDescriptor> {
    let from_env = std::env::var_os(ENV_DESCRIPTOR_PATH).map(PathBuf::from);
    resolve(explicit, from_env.as_deref(), dir)
}

/// Locate the descriptor among the well-known file names in `dir`, ignoring
/// the environment.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when none of the names exist.
pub fn find_in_dir(dir: &Path) -> Result<DiscoveredDescriptor> {
    resolve(None, None, dir)
}

fn resolve(
    explicit: Option<&Path>,
    from_env: Option<&Path>,
    dir: &Path,
) -> Result<DiscoveredDescriptor> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                searched: vec![path.to_path_buf()],
            });
        }
        return located(path.to_path_buf(), DescriptorOrigin::Explicit);
    }

    let mut searched = Vec::new();

    if let Some(path) = from_env {
        if path.is_file() {
            return located(path.to_path_buf(), DescriptorOrigin::Environment);
        }
        tracing::warn!(
            path = %path.display(),
            "{} points to a missing file, falling back to the project directory",
            ENV_DESCRIPTOR_PATH
        );
        searched.push(path.to_path_buf());
    }

    let candidates: Vec<PathBuf> = DESCRIPTOR_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .collect();
    let present: Vec<&PathBuf> = candidates.iter().filter(|path| path.is_file()).collect();

    if let Some(first) = present.first() {
        if present.len() > 1 {
            tracing::warn!(
                using = %first.display(),
                ignored = ?present[1..].iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                "several release descriptors found"
            );
        }
        return located((*first).clone(), DescriptorOrigin::Directory);
    }

    if let Some(script) = SCRIPT_DESCRIPTOR_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    {
        return Err(ConfigError::ScriptDescriptor { path: script });
    }

    searched.extend(candidates);
    Err(ConfigError::NotFound { searched })
}

fn located(path: PathBuf, origin: DescriptorOrigin) -> Result<DiscoveredDescriptor> {
    let format = Format::from_path(&path).ok_or_else(|| {
        ConfigError::LoadError(format!(
            "Unsupported file format: {}. Supported: .versionrc, .json, .yaml, .yml, .toml",
            path.display()
        ))
    })?;

    tracing::debug!(path = %path.display(), %format, %origin, "located release descriptor");

    Ok(DiscoveredDescriptor {
        path,
        format,
        origin,
    })
}
