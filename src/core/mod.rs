//! Core descriptor loading types.

mod builder;
pub mod discovery;
mod loader;
pub(crate) mod validation;

pub use builder::ReleaseConfigBuilder;
pub use discovery::{DescriptorOrigin, DiscoveredDescriptor};
pub use loader::ConfigLoader;
pub use validation::Validate;
