//! Configuration source trait.

use crate::error::Result;
use std::collections::HashMap;

/// Trait for descriptor sources.
///
/// Implement this trait to feed the loader from somewhere other than files,
/// inline documents or environment variables.
pub trait ConfigSource: Send + Sync {
    /// Load the descriptor as a map of top-level keys to values.
    ///
    /// The returned map will be merged with other sources according to precedence rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Environment variables: 300
    /// - Files and inline documents: 100, 110, 120, ... in the order added
    fn priority(&self) -> i32 {
        100
    }
}
