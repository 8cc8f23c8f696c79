//! The unvalidated document shape of a release descriptor.
//!
//! Every field is optional here so that missing fields can be reported as
//! validation errors together with every other problem, instead of stopping
//! at the first one the deserializer trips over.

use crate::error::ValidationError;
use crate::model::{Lifecycle, Scripts};
use config::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A descriptor exactly as written in the document.
///
/// Keys are camelCase; lower-cased spellings are accepted because
/// environment variables cannot carry case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReleaseConfig {
    /// `preMajor`
    #[serde(default, alias = "premajor", skip_serializing_if = "Option::is_none")]
    pub pre_major: Option<bool>,

    /// `issueUrlFormat`
    #[serde(default, alias = "issueurlformat", skip_serializing_if = "Option::is_none")]
    pub issue_url_format: Option<String>,

    /// `commitUrlFormat`
    #[serde(default, alias = "commiturlformat", skip_serializing_if = "Option::is_none")]
    pub commit_url_format: Option<String>,

    /// `compareUrlFormat`
    #[serde(default, alias = "compareurlformat", skip_serializing_if = "Option::is_none")]
    pub compare_url_format: Option<String>,

    /// `releaseCommitMessageFormat`
    #[serde(
        default,
        alias = "releasecommitmessageformat",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_commit_message_format: Option<String>,

    /// `header`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// `scripts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Scripts>,

    /// `types`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<RawTypeRule>>,
}

/// One entry of `types` exactly as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTypeRule {
    /// `type`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<String>,

    /// `section`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// `hidden`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// The value kind a descriptor field must have in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    Boolean,
    String,
    List,
    Table,
}

impl Expected {
    fn matches(self, kind: &ValueKind) -> bool {
        matches!(
            (self, kind),
            (_, ValueKind::Nil)
                | (Expected::Boolean, ValueKind::Boolean(_))
                | (Expected::String, ValueKind::String(_))
                | (Expected::List, ValueKind::Array(_))
                | (Expected::Table, ValueKind::Table(_))
        )
    }

    fn reason(self) -> &'static str {
        match self {
            Expected::Boolean => "expected a boolean",
            Expected::String => "expected a string",
            Expected::List => "expected a list",
            Expected::Table => "expected a table",
        }
    }
}

const TOP_LEVEL_FIELDS: [(&str, Expected); 8] = [
    ("preMajor", Expected::Boolean),
    ("issueUrlFormat", Expected::String),
    ("commitUrlFormat", Expected::String),
    ("compareUrlFormat", Expected::String),
    ("releaseCommitMessageFormat", Expected::String),
    ("header", Expected::String),
    ("scripts", Expected::Table),
    ("types", Expected::List),
];

const TYPE_RULE_FIELDS: [(&str, Expected); 3] = [
    ("type", Expected::String),
    ("section", Expected::String),
    ("hidden", Expected::Boolean),
];

/// Check the value kind of every known field in a merged document.
///
/// The `config` deserializer coerces between scalars (`1` and `"yes"`
/// become `true`, `5` becomes `"5"`), so mistyped fields have to be caught
/// on the document itself. `null` counts as absent. Unknown keys are left to
/// the deserializer.
pub(crate) fn check_value_kinds(document: &HashMap<String, Value>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (field, expected) in TOP_LEVEL_FIELDS {
        let Some(value) = document
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
        else {
            continue;
        };

        if !expected.matches(&value.kind) {
            errors.push(ValidationError::invalid_field(field, expected.reason()));
            continue;
        }

        match &value.kind {
            ValueKind::Table(hooks) if field == "scripts" => {
                for stage in Lifecycle::ALL {
                    if let Some(command) = hooks.get(stage.key()) {
                        check_kind(
                            &format!("scripts.{}", stage.key()),
                            command,
                            Expected::String,
                            &mut errors,
                        );
                    }
                }
            }
            ValueKind::Array(rules) => {
                for (index, rule) in rules.iter().enumerate() {
                    let prefix = format!("types[{}]", index);
                    match &rule.kind {
                        ValueKind::Table(entries) => {
                            for (name, expected) in TYPE_RULE_FIELDS {
                                if let Some(value) = entries.get(name) {
                                    check_kind(
                                        &format!("{}.{}", prefix, name),
                                        value,
                                        expected,
                                        &mut errors,
                                    );
                                }
                            }
                        }
                        _ => errors.push(ValidationError::invalid_field(
                            prefix,
                            Expected::Table.reason(),
                        )),
                    }
                }
            }
            _ => {}
        }
    }

    errors
}

fn check_kind(field: &str, value: &Value, expected: Expected, errors: &mut Vec<ValidationError>) {
    if !expected.matches(&value.kind) {
        errors.push(ValidationError::invalid_field(field, expected.reason()));
    }
}
