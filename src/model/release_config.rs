//! The validated release descriptor.

use crate::core::Validate;
use crate::core::validation::{check_scripts, check_template, check_types};
use crate::error::{Result, ValidationError};
use crate::model::raw::{RawReleaseConfig, RawTypeRule};
use crate::model::{Scripts, Template, TemplateKind, TypeRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Release commit message used when the descriptor does not set one.
pub const DEFAULT_RELEASE_COMMIT_MESSAGE_FORMAT: &str = "chore(release): {{currentTag}}";

/// Changelog header used when the descriptor does not set one.
pub const DEFAULT_HEADER: &str = "# Changelog\n";

/// A validated release descriptor.
///
/// Values are only obtained through loading (see
/// [`ReleaseConfig::builder`]) or [`ReleaseConfig::from_parts`], both of
/// which reject descriptors that break an invariant. The value is read-only
/// afterwards.
///
/// # Examples
///
/// ```rust
/// use versionrc::model::{ReleaseConfig, Scripts, TypeRule};
///
/// let config = ReleaseConfig::from_parts(
///     true,
///     "https://github.com/keptn/keptn/issues/{{id}}",
///     Scripts::new(),
///     vec![TypeRule::visible("feat", "Features"), TypeRule::hidden("ci")],
/// )
/// .unwrap();
///
/// assert_eq!(config.section_for("feat"), Some("Features"));
/// assert!(config.is_hidden("ci"));
/// assert_eq!(
///     config.issue_url(42).unwrap(),
///     "https://github.com/keptn/keptn/issues/42"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReleaseConfig", into = "RawReleaseConfig")]
pub struct ReleaseConfig {
    pre_major: bool,
    issue_url_format: Template,
    commit_url_format: Option<Template>,
    compare_url_format: Option<Template>,
    release_commit_message_format: Option<Template>,
    header: Option<String>,
    scripts: Scripts,
    types: Vec<TypeRule>,
}

/// The commit types rendered under one section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup<'a> {
    /// Section heading.
    pub title: &'a str,
    /// Commit types rendered under it, in declaration order.
    pub types: Vec<&'a str>,
}

impl ReleaseConfig {
    /// Assemble a descriptor from its required parts and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::ValidationError`] listing every
    /// broken invariant.
    pub fn from_parts(
        pre_major: bool,
        issue_url_format: impl Into<Template>,
        scripts: Scripts,
        types: Vec<TypeRule>,
    ) -> Result<Self> {
        Self {
            pre_major,
            issue_url_format: issue_url_format.into(),
            commit_url_format: None,
            compare_url_format: None,
            release_commit_message_format: None,
            header: None,
            scripts,
            types,
        }
        .revalidated()
    }

    /// Set `commitUrlFormat` (placeholder `{{hash}}`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the template is not acceptable.
    pub fn with_commit_url_format(mut self, template: impl Into<Template>) -> Result<Self> {
        self.commit_url_format = Some(template.into());
        self.revalidated()
    }

    /// Set `compareUrlFormat` (placeholders `{{previousTag}}`, `{{currentTag}}`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the template is not acceptable.
    pub fn with_compare_url_format(mut self, template: impl Into<Template>) -> Result<Self> {
        self.compare_url_format = Some(template.into());
        self.revalidated()
    }

    /// Set `releaseCommitMessageFormat` (placeholder `{{currentTag}}`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the template is not acceptable.
    pub fn with_release_commit_message_format(
        mut self,
        template: impl Into<Template>,
    ) -> Result<Self> {
        self.release_commit_message_format = Some(template.into());
        self.revalidated()
    }

    /// Set the changelog header.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    fn revalidated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Whether breaking changes stay below a major bump (pre-1.0 semantics).
    pub fn pre_major(&self) -> bool {
        self.pre_major
    }

    /// Template for issue links.
    pub fn issue_url_format(&self) -> &Template {
        &self.issue_url_format
    }

    /// Template for commit links, if set.
    pub fn commit_url_format(&self) -> Option<&Template> {
        self.commit_url_format.as_ref()
    }

    /// Template for tag comparison links, if set.
    pub fn compare_url_format(&self) -> Option<&Template> {
        self.compare_url_format.as_ref()
    }

    /// Template for the release commit message, if set explicitly.
    pub fn release_commit_message_format(&self) -> Option<&Template> {
        self.release_commit_message_format.as_ref()
    }

    /// The changelog header, falling back to [`DEFAULT_HEADER`].
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(DEFAULT_HEADER)
    }

    /// Lifecycle script hooks.
    pub fn scripts(&self) -> &Scripts {
        &self.scripts
    }

    /// Type rules in declaration order.
    pub fn types(&self) -> &[TypeRule] {
        &self.types
    }

    /// Link to issue `id`.
    ///
    /// # Errors
    ///
    /// Only fails if the template cannot be processed; loaded descriptors
    /// always render.
    pub fn issue_url(&self, id: impl fmt::Display) -> Result<String> {
        let id = id.to_string();
        self.issue_url_format.render(&[("id", id.as_str())])
    }

    /// Link to commit `hash`, when `commitUrlFormat` is set.
    ///
    /// # Errors
    ///
    /// Only fails if the template cannot be processed.
    pub fn commit_url(&self, hash: &str) -> Result<Option<String>> {
        self.commit_url_format
            .as_ref()
            .map(|template| template.render(&[("hash", hash)]))
            .transpose()
    }

    /// Link comparing `previous` with `current`, when `compareUrlFormat` is set.
    ///
    /// # Errors
    ///
    /// Only fails if the template cannot be processed.
    pub fn compare_url(&self, previous: &str, current: &str) -> Result<Option<String>> {
        self.compare_url_format
            .as_ref()
            .map(|template| {
                template.render(&[("previousTag", previous), ("currentTag", current)])
            })
            .transpose()
    }

    /// Message of the release commit for `tag`.
    ///
    /// # Errors
    ///
    /// Only fails if the template cannot be processed.
    pub fn release_commit_message(&self, tag: &str) -> Result<String> {
        match &self.release_commit_message_format {
            Some(template) => template.render(&[("currentTag", tag)]),
            None => Template::new(DEFAULT_RELEASE_COMMIT_MESSAGE_FORMAT).render(&[("currentTag", tag)]),
        }
    }

    /// The rule declared for `commit_type`.
    pub fn type_rule(&self, commit_type: &str) -> Option<&TypeRule> {
        self.types.iter().find(|rule| rule.commit_type() == commit_type)
    }

    /// The section `commit_type` is rendered under. `None` for hidden and
    /// undeclared types.
    pub fn section_for(&self, commit_type: &str) -> Option<&str> {
        self.type_rule(commit_type).and_then(TypeRule::section)
    }

    /// Whether `commit_type` is declared hidden.
    pub fn is_hidden(&self, commit_type: &str) -> bool {
        self.type_rule(commit_type).is_some_and(TypeRule::is_hidden)
    }

    /// Hidden commit types in declaration order.
    pub fn hidden_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.types
            .iter()
            .filter(|rule| rule.is_hidden())
            .map(TypeRule::commit_type)
    }

    /// Section headings in render order, each listed once.
    pub fn visible_sections(&self) -> Vec<&str> {
        self.section_layout()
            .into_iter()
            .map(|group| group.title)
            .collect()
    }

    /// Sections in render order with the commit types grouped under each.
    ///
    /// A section is placed where its first type is declared; later types
    /// naming the same section join that group.
    pub fn section_layout(&self) -> Vec<SectionGroup<'_>> {
        let mut groups: Vec<SectionGroup<'_>> = Vec::new();
        for rule in &self.types {
            let Some(title) = rule.section() else {
                continue;
            };
            match groups.iter_mut().find(|group| group.title == title) {
                Some(group) => group.types.push(rule.commit_type()),
                None => groups.push(SectionGroup {
                    title,
                    types: vec![rule.commit_type()],
                }),
            }
        }
        groups
    }
}

impl Validate for ReleaseConfig {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut errors = Vec::new();

        check_template(
            "issueUrlFormat",
            Some(&self.issue_url_format),
            TemplateKind::IssueUrl,
            &mut errors,
        );
        check_template(
            "commitUrlFormat",
            self.commit_url_format.as_ref(),
            TemplateKind::CommitUrl,
            &mut errors,
        );
        check_template(
            "compareUrlFormat",
            self.compare_url_format.as_ref(),
            TemplateKind::CompareUrl,
            &mut errors,
        );
        check_template(
            "releaseCommitMessageFormat",
            self.release_commit_message_format.as_ref(),
            TemplateKind::ReleaseCommitMessage,
            &mut errors,
        );
        check_scripts(&self.scripts, &mut errors);
        check_types(self.types.iter().enumerate(), self.types.len(), &mut errors);

        ValidationError::from_errors(errors)
    }
}

impl TryFrom<RawReleaseConfig> for ReleaseConfig {
    type Error = ValidationError;

    fn try_from(raw: RawReleaseConfig) -> std::result::Result<Self, Self::Error> {
        let mut errors = Vec::new();

        if raw.pre_major.is_none() {
            errors.push(ValidationError::missing_field("preMajor"));
        }

        let issue_url_format = raw.issue_url_format.map(Template::new);
        if issue_url_format.is_none() {
            errors.push(ValidationError::missing_field("issueUrlFormat"));
        }
        check_template(
            "issueUrlFormat",
            issue_url_format.as_ref(),
            TemplateKind::IssueUrl,
            &mut errors,
        );

        let commit_url_format = raw.commit_url_format.map(Template::new);
        check_template(
            "commitUrlFormat",
            commit_url_format.as_ref(),
            TemplateKind::CommitUrl,
            &mut errors,
        );
        let compare_url_format = raw.compare_url_format.map(Template::new);
        check_template(
            "compareUrlFormat",
            compare_url_format.as_ref(),
            TemplateKind::CompareUrl,
            &mut errors,
        );
        let release_commit_message_format = raw.release_commit_message_format.map(Template::new);
        check_template(
            "releaseCommitMessageFormat",
            release_commit_message_format.as_ref(),
            TemplateKind::ReleaseCommitMessage,
            &mut errors,
        );

        let scripts = raw.scripts.unwrap_or_default();
        check_scripts(&scripts, &mut errors);

        let mut types = Vec::new();
        match raw.types {
            None => errors.push(ValidationError::missing_field("types")),
            Some(raw_types) => {
                let declared = raw_types.len();
                let mut converted = Vec::with_capacity(declared);
                for (index, raw_rule) in raw_types.into_iter().enumerate() {
                    match TypeRule::from_raw(raw_rule, &format!("types[{}]", index)) {
                        Ok(rule) => converted.push((index, rule)),
                        Err(rule_errors) => errors.extend(rule_errors),
                    }
                }
                check_types(
                    converted.iter().map(|(index, rule)| (*index, rule)),
                    declared,
                    &mut errors,
                );
                types = converted.into_iter().map(|(_, rule)| rule).collect();
            }
        }

        ValidationError::from_errors(errors)?;

        match (raw.pre_major, issue_url_format) {
            (Some(pre_major), Some(issue_url_format)) => Ok(Self {
                pre_major,
                issue_url_format,
                commit_url_format,
                compare_url_format,
                release_commit_message_format,
                header: raw.header,
                scripts,
                types,
            }),
            _ => Err(ValidationError::custom("incomplete release descriptor")),
        }
    }
}

impl From<ReleaseConfig> for RawReleaseConfig {
    fn from(config: ReleaseConfig) -> Self {
        RawReleaseConfig {
            pre_major: Some(config.pre_major),
            issue_url_format: Some(config.issue_url_format.as_str().to_string()),
            commit_url_format: config.commit_url_format.map(|t| t.as_str().to_string()),
            compare_url_format: config.compare_url_format.map(|t| t.as_str().to_string()),
            release_commit_message_format: config
                .release_commit_message_format
                .map(|t| t.as_str().to_string()),
            header: config.header,
            scripts: (!config.scripts.is_empty()).then_some(config.scripts),
            types: Some(config.types.into_iter().map(RawTypeRule::from).collect()),
        }
    }
}
