//! Commit-type to changelog-section rules.

use crate::error::ValidationError;
use crate::model::raw::RawTypeRule;
use serde::{Deserialize, Serialize};

/// Where commits of a type end up in the rendered changelog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Rendered under this section heading.
    Section(String),
    /// Left out of the rendered changelog.
    Hidden,
}

/// Maps one commit type (`feat`, `fix`, ...) to a section, or hides it.
///
/// A rule carries either a section or the hidden flag, never both and never
/// neither. The type enforces this; documents breaking the rule are rejected
/// when they are loaded.
///
/// # Examples
///
/// ```rust
/// use versionrc::model::TypeRule;
///
/// let feat = TypeRule::visible("feat", "Features");
/// assert_eq!(feat.section(), Some("Features"));
///
/// let ci = TypeRule::hidden("ci");
/// assert!(ci.is_hidden());
/// assert_eq!(ci.section(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTypeRule", into = "RawTypeRule")]
pub struct TypeRule {
    commit_type: String,
    visibility: Visibility,
}

impl TypeRule {
    /// A rule rendering `commit_type` under `section`.
    pub fn visible(commit_type: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            visibility: Visibility::Section(section.into()),
        }
    }

    /// A rule hiding `commit_type`.
    pub fn hidden(commit_type: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            visibility: Visibility::Hidden,
        }
    }

    /// The commit tag this rule matches.
    pub fn commit_type(&self) -> &str {
        &self.commit_type
    }

    /// The section heading, absent for hidden rules.
    pub fn section(&self) -> Option<&str> {
        match &self.visibility {
            Visibility::Section(section) => Some(section),
            Visibility::Hidden => None,
        }
    }

    /// Whether commits of this type are left out of the changelog.
    pub fn is_hidden(&self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    /// Section or hidden.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Build a rule from its document shape, reporting problems with field
    /// paths under `prefix` (e.g. `types[3]`).
    pub(crate) fn from_raw(raw: RawTypeRule, prefix: &str) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let path = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            }
        };

        let commit_type = raw.commit_type;
        if commit_type.is_none() {
            errors.push(ValidationError::missing_field(path("type")));
        }

        let visibility = match (raw.section, raw.hidden.unwrap_or(false)) {
            (Some(section), false) => Some(Visibility::Section(section)),
            (None, true) => Some(Visibility::Hidden),
            (Some(_), true) => {
                errors.push(ValidationError::invalid_field(
                    path("section"),
                    "a hidden type must not declare a section",
                ));
                None
            }
            (None, false) => {
                errors.push(ValidationError::invalid_field(
                    path("section"),
                    "required unless `hidden: true` is set",
                ));
                None
            }
        };

        match (commit_type, visibility) {
            (Some(commit_type), Some(visibility)) if errors.is_empty() => Ok(Self {
                commit_type,
                visibility,
            }),
            _ => Err(errors),
        }
    }
}

impl TryFrom<RawTypeRule> for TypeRule {
    type Error = ValidationError;

    fn try_from(raw: RawTypeRule) -> Result<Self, Self::Error> {
        Self::from_raw(raw, "").map_err(|errors| match ValidationError::from_errors(errors) {
            Err(err) => err,
            Ok(()) => ValidationError::custom("invalid type rule"),
        })
    }
}

impl From<TypeRule> for RawTypeRule {
    fn from(rule: TypeRule) -> Self {
        match rule.visibility {
            Visibility::Section(section) => RawTypeRule {
                commit_type: Some(rule.commit_type),
                section: Some(section),
                hidden: None,
            },
            Visibility::Hidden => RawTypeRule {
                commit_type: Some(rule.commit_type),
                section: None,
                hidden: Some(true),
            },
        }
    }
}
