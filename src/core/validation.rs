//! Descriptor validation support.

use crate::error::ValidationError;
use crate::model::{Scripts, Template, TemplateKind, TypeRule};
use std::collections::HashMap;

/// Characters that delimit a conventional commit header and therefore can
/// never be part of a commit type.
const RESERVED_TYPE_CHARS: [char; 4] = [':', '(', ')', '!'];

/// Trait for descriptor validation.
///
/// [`crate::model::ReleaseConfig`] implements it with the built-in
/// invariants. Additional, caller-specific rules are passed to
/// [`crate::core::ReleaseConfigBuilder::with_validation`].
///
/// # Examples
///
/// ```rust
/// use versionrc::core::Validate;
/// use versionrc::model::{ReleaseConfig, Scripts, TypeRule};
///
/// let config = ReleaseConfig::from_parts(
///     false,
///     "https://github.com/keptn/keptn/issues/{{id}}",
///     Scripts::new(),
///     vec![TypeRule::visible("feat", "Features")],
/// )
/// .unwrap();
///
/// assert!(config.validate().is_ok());
/// ```
pub trait Validate {
    /// Validate the descriptor.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Check type rules: at least one declared, well-formed tags, non-blank
/// sections, no tag declared twice.
///
/// `rules` carries each rule with its index in the document; `declared` is
/// the number of entries in the document, including ones that failed to
/// convert.
pub(crate) fn check_types<'a, I>(rules: I, declared: usize, errors: &mut Vec<ValidationError>)
where
    I: IntoIterator<Item = (usize, &'a TypeRule)>,
{
    if declared == 0 {
        errors.push(ValidationError::invalid_field(
            "types",
            "must declare at least one commit type",
        ));
        return;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, rule) in rules {
        let commit_type = rule.commit_type();

        if commit_type.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                format!("types[{}].type", index),
                "must not be empty",
            ));
        } else if commit_type
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_TYPE_CHARS.contains(&c))
        {
            errors.push(ValidationError::invalid_field(
                format!("types[{}].type", index),
                format!(
                    "'{}' must not contain whitespace or any of ':', '(', ')', '!'",
                    commit_type
                ),
            ));
        }

        if rule.section().is_some_and(|section| section.trim().is_empty()) {
            errors.push(ValidationError::invalid_field(
                format!("types[{}].section", index),
                "must not be empty",
            ));
        }

        match seen.get(commit_type) {
            Some(&first) => errors.push(ValidationError::DuplicateType {
                type_name: commit_type.to_string(),
                first,
                duplicate: index,
            }),
            None => {
                seen.insert(commit_type, index);
            }
        }
    }
}

/// Check an optional template; absent templates pass.
pub(crate) fn check_template(
    field: &str,
    template: Option<&Template>,
    kind: TemplateKind,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(template) = template {
        errors.extend(template.check(field, kind));
    }
}

/// Check that every registered hook has a command to run.
pub(crate) fn check_scripts(scripts: &Scripts, errors: &mut Vec<ValidationError>) {
    for (stage, command) in scripts.iter() {
        if command.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                format!("scripts.{}", stage.key()),
                "must not be empty",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lifecycle;

    fn run(rules: &[TypeRule]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_types(rules.iter().enumerate(), rules.len(), &mut errors);
        errors
    }

    #[test]
    fn test_valid_types() {
        let errors = run(&[
            TypeRule::visible("feat", "Features"),
            TypeRule::hidden("ci"),
        ]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_list() {
        let errors = run(&[]);
        assert_eq!(
            errors,
            vec![ValidationError::invalid_field(
                "types",
                "must declare at least one commit type"
            )]
        );
    }

    #[test]
    fn test_duplicate_type() {
        let errors = run(&[
            TypeRule::visible("feat", "Features"),
            TypeRule::visible("fix", "Bug Fixes"),
            TypeRule::visible("feat", "More Features"),
        ]);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateType {
                type_name: "feat".into(),
                first: 0,
                duplicate: 2,
            }]
        );
    }

    #[test]
    fn test_types_compare_case_sensitively() {
        let errors = run(&[TypeRule::visible("feat", "Features"), TypeRule::hidden("Feat")]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_malformed_type() {
        let errors = run(&[
            TypeRule::visible("", "Nothing"),
            TypeRule::visible("feat(core)", "Core"),
            TypeRule::hidden("two words"),
        ]);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].to_string().contains("types[0].type"));
        assert!(errors[1].to_string().contains("types[1].type"));
        assert!(errors[2].to_string().contains("types[2].type"));
    }

    #[test]
    fn test_blank_section() {
        let errors = run(&[TypeRule::visible("feat", "  ")]);
        assert_eq!(
            errors,
            vec![ValidationError::invalid_field("types[0].section", "must not be empty")]
        );
    }

    #[test]
    fn test_blank_script() {
        let mut errors = Vec::new();
        check_scripts(
            &Scripts::new()
                .with_hook(Lifecycle::Postchangelog, "./post.sh")
                .with_hook(Lifecycle::Pretag, " "),
            &mut errors,
        );
        assert_eq!(
            errors,
            vec![ValidationError::invalid_field("scripts.pretag", "must not be empty")]
        );
    }

    #[test]
    fn test_absent_template_passes() {
        let mut errors = Vec::new();
        check_template("commitUrlFormat", None, TemplateKind::CommitUrl, &mut errors);
        assert!(errors.is_empty());
    }
}
