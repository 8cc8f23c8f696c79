//! `{{placeholder}}` templates used for links and release commit messages.

use crate::error::{ConfigError, Result, ValidationError};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches `{{name}}`, tolerating whitespace inside the braces.
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([^{}\s]*)\s*\}\}";

/// An absolute URL: `scheme://` followed by at least one non-space character.
const ABSOLUTE_URL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$";

fn placeholder_regex() -> Result<Regex> {
    Regex::new(PLACEHOLDER_PATTERN).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// What a template is used for. Decides which placeholders it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `issueUrlFormat`: link to an issue.
    IssueUrl,
    /// `commitUrlFormat`: link to a commit.
    CommitUrl,
    /// `compareUrlFormat`: link comparing two tags.
    CompareUrl,
    /// `releaseCommitMessageFormat`: message of the release commit.
    ReleaseCommitMessage,
}

impl TemplateKind {
    /// Placeholders this kind of template may contain.
    pub fn allowed(self) -> &'static [&'static str] {
        match self {
            Self::IssueUrl => &["id"],
            Self::CommitUrl => &["hash"],
            Self::CompareUrl => &["previousTag", "currentTag"],
            Self::ReleaseCommitMessage => &["currentTag"],
        }
    }

    /// Placeholders this kind of template must contain.
    pub fn required(self) -> &'static [&'static str] {
        match self {
            Self::ReleaseCommitMessage => &[],
            other => other.allowed(),
        }
    }

    /// Whether the rendered template must be an absolute URL.
    pub fn is_url(self) -> bool {
        !matches!(self, Self::ReleaseCommitMessage)
    }
}

/// A text template with `{{name}}` placeholders.
///
/// # Examples
///
/// ```rust
/// use versionrc::model::Template;
///
/// let template = Template::new("https://github.com/keptn/keptn/issues/{{id}}");
/// let url = template.render(&[("id", "42")]).unwrap();
/// assert_eq!(url, "https://github.com/keptn/keptn/issues/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
    /// Wrap a raw template string. No checks are made here; see
    /// [`Template::check`].
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the placeholders in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns an error only if the placeholder pattern fails to compile.
    pub fn placeholders(&self) -> Result<Vec<String>> {
        let pattern = placeholder_regex()?;
        let mut names: Vec<String> = Vec::new();
        for caps in pattern.captures_iter(&self.0) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Substitute every placeholder with its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TemplateError`] if a placeholder has no value.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        let pattern = placeholder_regex()?;
        let mut missing: Vec<String> = Vec::new();

        let rendered = pattern.replace_all(&self.0, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => (*value).to_string(),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        if !missing.is_empty() {
            return Err(ConfigError::TemplateError(format!(
                "no value supplied for {} in '{}'",
                missing
                    .iter()
                    .map(|m| format!("{{{{{}}}}}", m))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.0
            )));
        }

        Ok(rendered.into_owned())
    }

    /// Check the template against the rules for `kind`, reporting problems
    /// under `field`.
    pub fn check(&self, field: &str, kind: TemplateKind) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.0.trim().is_empty() {
            errors.push(ValidationError::invalid_field(field, "must not be empty"));
            return errors;
        }

        let pattern = match placeholder_regex() {
            Ok(pattern) => pattern,
            Err(e) => {
                errors.push(ValidationError::invalid_field(field, e.to_string()));
                return errors;
            }
        };

        let allowed = kind.allowed();
        let mut found: Vec<&str> = Vec::new();
        let mut stray_brace = false;
        for caps in pattern.captures_iter(&self.0) {
            if let Some(whole) = caps.get(0) {
                // `{{{id}}}` matches `{{id}}` with a brace left on either side
                stray_brace |= self.0[..whole.start()].ends_with('{')
                    || self.0[whole.end()..].starts_with('}');
            }
            let name = caps.get(1).map_or("", |m| m.as_str());
            if !allowed.contains(&name) {
                errors.push(ValidationError::invalid_field(
                    field,
                    format!(
                        "unknown placeholder '{}' (allowed: {})",
                        &caps[0],
                        describe(allowed)
                    ),
                ));
            }
            found.push(name);
        }

        for required in kind.required() {
            if !found.contains(required) {
                errors.push(ValidationError::invalid_field(
                    field,
                    format!("must contain {{{{{}}}}}", required),
                ));
            }
        }

        let stripped = pattern.replace_all(&self.0, "");
        if stray_brace || stripped.contains("{{") || stripped.contains("}}") {
            errors.push(ValidationError::invalid_field(
                field,
                "contains unbalanced placeholder braces",
            ));
        }

        if errors.is_empty() && kind.is_url() {
            let sample: Vec<(&str, &str)> = allowed.iter().map(|name| (*name, "42")).collect();
            let is_absolute = self
                .render(&sample)
                .ok()
                .zip(Regex::new(ABSOLUTE_URL_PATTERN).ok())
                .is_some_and(|(url, absolute)| absolute.is_match(&url));
            if !is_absolute {
                errors.push(ValidationError::invalid_field(
                    field,
                    "must be an absolute URL (scheme://...)",
                ));
            }
        }

        errors
    }
}

fn describe(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("{{{{{}}}}}", name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
