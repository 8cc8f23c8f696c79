//! # versionrc
//!
//! Typed, validated loading of the release descriptor (`.versionrc`) that
//! drives a conventional-commit changelog generator.
//!
//! ## Overview
//!
//! The descriptor maps commit types to changelog sections, templates issue
//! and commit links, and registers lifecycle script hooks. `versionrc`
//! locates it, merges it from files, inline documents and environment
//! variables, checks every invariant and hands out an immutable
//! [`model::ReleaseConfig`]:
//! - Commit types keep their declaration order, which is the section order
//! - Every type is declared once and is either shown under a section or hidden
//! - `issueUrlFormat` contains `{{id}}` and renders to an absolute URL
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use versionrc::prelude::*;
//!
//! # fn example() -> versionrc::error::Result<()> {
//! // Find .versionrc / .versionrc.json / .versionrc.yaml / ... and load it
//! let config = ReleaseConfig::builder()
//!     .with_discovery(".")
//!     .with_env_overrides("VERSIONRC", "__")
//!     .build()?;
//!
//! for section in config.visible_sections() {
//!     println!("## {}", section);
//! }
//! println!("{}", config.issue_url(42)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! Loading understands JSON, YAML and TOML unconditionally. The flags
//! below enable writing descriptors back out:
//!
//! - `json` (default): [`model::ReleaseConfig::to_json_string`]
//! - `yaml`: `ReleaseConfig::to_yaml_string`
//! - `toml`: `ReleaseConfig::to_toml_string`
//! - `all-formats`: all of the above

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod model;
pub mod sources;

#[cfg(any(feature = "json", feature = "yaml", feature = "toml"))]
mod export;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ReleaseConfigBuilder, Validate};
    pub use crate::error::{ConfigError, Result, ValidationError};
    pub use crate::model::{Lifecycle, ReleaseConfig, Scripts, Template, TypeRule, Visibility};
    pub use crate::sources::Format;
}
