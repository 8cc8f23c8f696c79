//! Error types for versionrc.

use std::fmt;

/// Result type alias for versionrc operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or using a release descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load the descriptor from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// No descriptor file could be located.
    #[error("No release descriptor found (searched: {})", display_paths(.searched))]
    NotFound {
        /// Every path that was probed, in probing order
        searched: Vec<std::path::PathBuf>,
    },

    /// The only descriptor present is a JavaScript module, which cannot be
    /// evaluated.
    #[error(
        "Found {} but no data descriptor; JavaScript descriptors cannot be evaluated, convert it to .versionrc.json",
        .path.display()
    )]
    ScriptDescriptor {
        /// The JavaScript descriptor that was found
        path: std::path::PathBuf,
    },

    /// Failed to deserialize the merged configuration.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// The descriptor violates one or more invariants.
    #[error("Configuration validation failed: {0}")]
    ValidationError(ValidationError),

    /// A template could not be rendered with the supplied values.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Failed to serialize a descriptor back to text.
    #[error("Failed to serialize configuration: {0}")]
    SerializationError(String),

    /// Generic error for other cases.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// The validation error behind this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::ValidationError(err) => Some(err),
            _ => None,
        }
    }
}

fn display_paths(paths: &[std::path::PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validation error for descriptor validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A required field is absent.
    MissingField(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// The same commit type is declared more than once.
    DuplicateType {
        /// The repeated commit type
        type_name: String,
        /// Index of the first declaration
        first: usize,
        /// Index of the repeated declaration
        duplicate: usize,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of errors: none is `Ok`, one is returned as is, more
    /// become [`ValidationError::Multiple`].
    pub fn from_errors(
        mut errors: Vec<ValidationError>,
    ) -> std::result::Result<(), ValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }

    /// Flatten nested [`ValidationError::Multiple`] values into single errors.
    pub fn flatten(self) -> Vec<ValidationError> {
        match self {
            Self::Multiple(errors) => errors.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::MissingField(field) => write!(f, "Field '{}' is required", field),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::DuplicateType {
                type_name,
                first,
                duplicate,
            } => write!(
                f,
                "Commit type '{}' is declared twice (types[{}] and types[{}])",
                type_name, first, duplicate
            ),
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err)
    }
}
