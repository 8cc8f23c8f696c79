//! Full integration tests exercising all features together.

use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use versionrc::core::discovery;
use versionrc::error::ValidationError;
use versionrc::prelude::*;

const KEPTN_DESCRIPTOR: &str = r#"{
  "preMajor": true,
  "issueUrlFormat": "https://github.com/keptn/keptn/issues/{{id}}",
  "scripts": {
    "postchangelog": "./gh-actions-scripts/post-changelog-actions.sh"
  },
  "types": [
    {"type": "feat", "section": "Features"},
    {"type": "fix", "section": "Bug Fixes"},
    {"type": "chore", "section": "Other"},
    {"type": "docs", "section": "Docs"},
    {"type": "perf", "section": "Performance"},
    {"type": "build", "hidden": true},
    {"type": "ci", "hidden": true},
    {"type": "refactor", "section": "Refactoring"},
    {"type": "revert", "hidden": true},
    {"type": "style", "hidden": true},
    {"type": "test", "hidden": true}
  ]
}"#;

#[test]
fn test_keptn_descriptor() {
    let config: ReleaseConfig = KEPTN_DESCRIPTOR.parse().unwrap();

    assert!(config.pre_major());
    assert_eq!(config.types().len(), 11);

    let hidden: HashSet<&str> = config.hidden_types().collect();
    assert_eq!(
        hidden,
        HashSet::from(["build", "ci", "revert", "style", "test"])
    );

    assert_eq!(
        config.visible_sections(),
        vec![
            "Features",
            "Bug Fixes",
            "Other",
            "Docs",
            "Performance",
            "Refactoring"
        ]
    );

    let order: Vec<&str> = config.types().iter().map(TypeRule::commit_type).collect();
    assert_eq!(
        order,
        vec![
            "feat", "fix", "chore", "docs", "perf", "build", "ci", "refactor", "revert", "style",
            "test"
        ]
    );

    assert_eq!(
        config.scripts().postchangelog(),
        Some("./gh-actions-scripts/post-changelog-actions.sh")
    );
    assert_eq!(config.header(), "# Changelog\n");
}

#[test]
fn test_keptn_issue_url() {
    let config: ReleaseConfig = KEPTN_DESCRIPTOR.parse().unwrap();

    let url = config.issue_url("42").unwrap();
    assert_eq!(url, "https://github.com/keptn/keptn/issues/42");
    assert!(!url.contains("{{"));
    assert!(!url.contains("}}"));
}

#[test]
fn test_discovery_in_project_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".versionrc"), KEPTN_DESCRIPTOR).unwrap();

    let found = discovery::find_in_dir(temp_dir.path()).unwrap();
    assert_eq!(found.path, temp_dir.path().join(".versionrc"));
    assert_eq!(found.format, Format::Json);

    let config = ReleaseConfig::discover(temp_dir.path()).unwrap();
    assert_eq!(config.types().len(), 11);
}

#[test]
fn test_discovery_with_nothing_to_find() {
    let temp_dir = TempDir::new().unwrap();
    let err = ReleaseConfig::discover(temp_dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound { .. }));
    assert!(err.to_string().contains(".versionrc.json"));
}

#[test]
fn test_discovery_explains_javascript_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".versionrc.js"),
        "module.exports = { preMajor: true };",
    )
    .unwrap();

    let err = ReleaseConfig::discover(temp_dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ScriptDescriptor { .. }));
    assert!(err.to_string().contains(".versionrc.json"));
}

#[test]
fn test_duplicate_type_fails_fast() {
    let err = ReleaseConfig::builder()
        .with_str(
            r#"{
  "preMajor": true,
  "issueUrlFormat": "https://github.com/keptn/keptn/issues/{{id}}",
  "types": [
    {"type": "feat", "section": "Features"},
    {"type": "fix", "section": "Bug Fixes"},
    {"type": "feat", "hidden": true}
  ]
}"#,
            Format::Json,
        )
        .build()
        .unwrap_err();

    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::DuplicateType {
            type_name: "feat".into(),
            first: 0,
            duplicate: 2,
        })
    );
}

#[test]
fn test_rule_with_neither_section_nor_hidden() {
    let err = ReleaseConfig::builder()
        .with_str(
            r#"{
  "preMajor": true,
  "issueUrlFormat": "https://github.com/keptn/keptn/issues/{{id}}",
  "types": [
    {"type": "feat", "section": "Features"},
    {"type": "chore", "hidden": false}
  ]
}"#,
            Format::Json,
        )
        .build()
        .unwrap_err();

    let errors = err.as_validation().cloned().unwrap().flatten();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("types[1].section"));
}

#[test]
fn test_shared_section_groups_types() {
    let config = ReleaseConfig::builder()
        .with_str(
            r#"
preMajor: false
issueUrlFormat: "https://gitlab.example.com/group/project/-/issues/{{id}}"
types:
  - type: feat
    section: Features
  - type: perf
    section: Improvements
  - type: refactor
    section: Improvements
  - type: test
    hidden: true
"#,
            Format::Yaml,
        )
        .build()
        .unwrap();

    assert_eq!(config.visible_sections(), vec!["Features", "Improvements"]);

    let layout = config.section_layout();
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[1].title, "Improvements");
    assert_eq!(layout[1].types, vec!["perf", "refactor"]);
}

#[test]
fn test_all_templates_render() {
    let config = ReleaseConfig::builder()
        .with_str(KEPTN_DESCRIPTOR, Format::Json)
        .with_str(
            r##"
commitUrlFormat: "https://github.com/keptn/keptn/commit/{{hash}}"
compareUrlFormat: "https://github.com/keptn/keptn/compare/{{previousTag}}...{{currentTag}}"
releaseCommitMessageFormat: "chore(release): cut {{currentTag}}"
header: "# Release Notes\n"
"##,
            Format::Yaml,
        )
        .build()
        .unwrap();

    assert_eq!(
        config.commit_url("a1b2c3d").unwrap().as_deref(),
        Some("https://github.com/keptn/keptn/commit/a1b2c3d")
    );
    assert_eq!(
        config.compare_url("0.8.0", "0.9.0").unwrap().as_deref(),
        Some("https://github.com/keptn/keptn/compare/0.8.0...0.9.0")
    );
    assert_eq!(
        config.release_commit_message("0.9.0").unwrap(),
        "chore(release): cut 0.9.0"
    );
    assert_eq!(config.header(), "# Release Notes\n");
}

#[test]
fn test_optional_templates_default() {
    let config: ReleaseConfig = KEPTN_DESCRIPTOR.parse().unwrap();

    assert_eq!(config.commit_url("a1b2c3d").unwrap(), None);
    assert_eq!(config.compare_url("0.8.0", "0.9.0").unwrap(), None);
    assert_eq!(
        config.release_commit_message("0.9.0").unwrap(),
        "chore(release): 0.9.0"
    );
}

#[test]
fn test_wrong_placeholder_is_rejected() {
    let err = ReleaseConfig::builder()
        .with_str(KEPTN_DESCRIPTOR, Format::Json)
        .with_str(
            "commitUrlFormat: \"https://github.com/keptn/keptn/commit/{{sha}}\"\n",
            Format::Yaml,
        )
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("commitUrlFormat"));
}

#[cfg(feature = "json")]
#[test]
fn test_json_round_trip_preserves_pairing() {
    let config: ReleaseConfig = KEPTN_DESCRIPTOR.parse().unwrap();
    let json = config.to_json_string().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for rule in value["types"].as_array().unwrap() {
        let hidden = rule.get("hidden").and_then(|h| h.as_bool()).unwrap_or(false);
        assert_eq!(hidden, rule.get("section").is_none());
    }

    let reloaded: ReleaseConfig = json.parse().unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_lookup_of_undeclared_type() {
    let config: ReleaseConfig = KEPTN_DESCRIPTOR.parse().unwrap();

    assert_eq!(config.type_rule("wip"), None);
    assert_eq!(config.section_for("wip"), None);
    assert!(!config.is_hidden("wip"));
    assert_eq!(
        config.type_rule("ci").map(TypeRule::visibility),
        Some(&Visibility::Hidden)
    );
}
