//! The release descriptor data model.

pub mod raw;
mod release_config;
mod scripts;
mod template;
mod type_rule;

pub use release_config::{
    DEFAULT_HEADER, DEFAULT_RELEASE_COMMIT_MESSAGE_FORMAT, ReleaseConfig, SectionGroup,
};
pub use scripts::{Lifecycle, Scripts};
pub use template::{Template, TemplateKind};
pub use type_rule::{TypeRule, Visibility};
