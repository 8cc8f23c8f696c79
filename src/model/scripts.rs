//! Lifecycle script hooks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the release lifecycle at which the consuming tool may run a
/// script hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lifecycle {
    /// Before anything else happens.
    Prerelease,
    /// Before the version is bumped.
    Prebump,
    /// After the version is bumped.
    Postbump,
    /// Before the changelog is written.
    Prechangelog,
    /// After the changelog is written.
    Postchangelog,
    /// Before the release commit.
    Precommit,
    /// After the release commit.
    Postcommit,
    /// Before tagging.
    Pretag,
    /// After tagging.
    Posttag,
}

impl Lifecycle {
    /// Every stage, in the order the consumer runs them.
    pub const ALL: [Lifecycle; 9] = [
        Lifecycle::Prerelease,
        Lifecycle::Prebump,
        Lifecycle::Postbump,
        Lifecycle::Prechangelog,
        Lifecycle::Postchangelog,
        Lifecycle::Precommit,
        Lifecycle::Postcommit,
        Lifecycle::Pretag,
        Lifecycle::Posttag,
    ];

    /// The key naming this stage inside `scripts`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Prerelease => "prerelease",
            Self::Prebump => "prebump",
            Self::Postbump => "postbump",
            Self::Prechangelog => "prechangelog",
            Self::Postchangelog => "postchangelog",
            Self::Precommit => "precommit",
            Self::Postcommit => "postcommit",
            Self::Pretag => "pretag",
            Self::Posttag => "posttag",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shell commands to run at lifecycle stages. Every hook is optional.
///
/// # Examples
///
/// ```rust
/// use versionrc::model::{Lifecycle, Scripts};
///
/// let scripts = Scripts::new()
///     .with_hook(Lifecycle::Postchangelog, "./gh-actions-scripts/post-changelog-actions.sh");
/// assert_eq!(
///     scripts.postchangelog(),
///     Some("./gh-actions-scripts/post-changelog-actions.sh")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scripts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prerelease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prebump: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    postbump: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prechangelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    postchangelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    precommit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    postcommit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pretag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    posttag: Option<String>,
}

impl Scripts {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command for `stage`, replacing any previous one.
    pub fn with_hook(mut self, stage: Lifecycle, command: impl Into<String>) -> Self {
        *self.slot_mut(stage) = Some(command.into());
        self
    }

    /// The command registered for `stage`.
    pub fn hook(&self, stage: Lifecycle) -> Option<&str> {
        self.slot(stage).as_deref()
    }

    /// The command run after the changelog is written.
    pub fn postchangelog(&self) -> Option<&str> {
        self.hook(Lifecycle::Postchangelog)
    }

    /// Registered hooks in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (Lifecycle, &str)> + '_ {
        Lifecycle::ALL
            .into_iter()
            .filter_map(move |stage| self.hook(stage).map(|command| (stage, command)))
    }

    /// Whether no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn slot(&self, stage: Lifecycle) -> &Option<String> {
        match stage {
            Lifecycle::Prerelease => &self.prerelease,
            Lifecycle::Prebump => &self.prebump,
            Lifecycle::Postbump => &self.postbump,
            Lifecycle::Prechangelog => &self.prechangelog,
            Lifecycle::Postchangelog => &self.postchangelog,
            Lifecycle::Precommit => &self.precommit,
            Lifecycle::Postcommit => &self.postcommit,
            Lifecycle::Pretag => &self.pretag,
            Lifecycle::Posttag => &self.posttag,
        }
    }

    fn slot_mut(&mut self, stage: Lifecycle) -> &mut Option<String> {
        match stage {
            Lifecycle::Prerelease => &mut self.prerelease,
            Lifecycle::Prebump => &mut self.prebump,
            Lifecycle::Postbump => &mut self.postbump,
            Lifecycle::Prechangelog => &mut self.prechangelog,
            Lifecycle::Postchangelog => &mut self.postchangelog,
            Lifecycle::Precommit => &mut self.precommit,
            Lifecycle::Postcommit => &mut self.postcommit,
            Lifecycle::Pretag => &mut self.pretag,
            Lifecycle::Posttag => &mut self.posttag,
        }
    }
}
