//! Configuration source implementations.

mod config_source;
mod env;
mod file;
mod format;
mod string;

pub use config_source::ConfigSource;
pub use env::{DEFAULT_ENV_PREFIX, EnvSource};
pub use file::FileSource;
pub use format::Format;
pub use string::StringSource;
