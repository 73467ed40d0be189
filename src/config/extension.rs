//! Plugin and theme declarations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::vcs::VcsOrigin;
use crate::error::ConfigError;

/// Base URL of the public tag archive used for extensions without a VCS source.
pub const TAG_ARCHIVE_URL: &str = "http://plugins.svn.wordpress.org";

/// The two extension kinds, treated uniformly except for activation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Plugin,
    Theme,
}

impl ExtensionKind {
    /// The wp-cli subcommand name for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Theme => "theme",
        }
    }

    /// Directory under the WordPress root where this kind is installed.
    #[must_use]
    pub const fn content_dir(self) -> &'static str {
        match self {
            Self::Plugin => "wp-content/plugins",
            Self::Theme => "wp-content/themes",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plugin" => Ok(Self::Plugin),
            "theme" => Ok(Self::Theme),
            other => Err(ConfigError::UnknownExtensionKind(other.to_string())),
        }
    }
}

/// One declared plugin or theme with its pinned version.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionSpec {
    /// Desired version string; compared lexically against the installed one.
    pub version: String,
    /// Source registry key. `None` when declared as `false` or omitted, in
    /// which case the extension comes from the public tag archive.
    #[serde(default, deserialize_with = "src_key")]
    pub src: Option<String>,
    /// Explicit origin user, overriding the registry default.
    #[serde(default)]
    pub vcs_user: Option<String>,
}

impl ExtensionSpec {
    /// The clone URL for a VCS-sourced extension:
    /// `{registry url}/{origin}/{id}.git`, where origin is the declared
    /// `vcs_user` override if present, else the registry's default user.
    #[must_use]
    pub fn clone_url(&self, id: &str, origin: &VcsOrigin) -> String {
        let user = self.vcs_user.as_deref().unwrap_or(&origin.user);
        format!("{}/{}/{}.git", origin.url, user, id)
    }

    /// The tag-archive URL for an extension without a VCS source.
    #[must_use]
    pub fn tag_url(&self, id: &str) -> String {
        format!("{TAG_ARCHIVE_URL}/{}/tags/{}/", id, self.version)
    }
}

/// Accept `src: <key>`, `src: false`, or an absent key; reject `src: true`.
fn src_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Key(String),
        Flag(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Flag(false)) => Ok(None),
        Some(Raw::Key(key)) => Ok(Some(key)),
        Some(Raw::Flag(true)) => Err(serde::de::Error::custom(
            "`src: true` is not a source key; name a VCS entry or use false",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn github() -> VcsOrigin {
        VcsOrigin {
            url: "https://github.com".to_string(),
            user: "acme".to_string(),
        }
    }

    #[test]
    fn kind_parses_plugin_and_theme() {
        assert_eq!("plugin".parse::<ExtensionKind>().unwrap(), ExtensionKind::Plugin);
        assert_eq!("theme".parse::<ExtensionKind>().unwrap(), ExtensionKind::Theme);
    }

    #[test]
    fn kind_rejects_anything_else() {
        let err = "widget".parse::<ExtensionKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownExtensionKind(k) if k == "widget"));
    }

    #[test]
    fn content_dir_per_kind() {
        assert_eq!(ExtensionKind::Plugin.content_dir(), "wp-content/plugins");
        assert_eq!(ExtensionKind::Theme.content_dir(), "wp-content/themes");
    }

    #[test]
    fn clone_url_uses_registry_user_by_default() {
        let spec: ExtensionSpec =
            serde_yaml::from_str("version: \"3.1\"\nsrc: github\n").unwrap();
        assert_eq!(
            spec.clone_url("akismet", &github()),
            "https://github.com/acme/akismet.git"
        );
    }

    #[test]
    fn clone_url_prefers_vcs_user_override() {
        let spec: ExtensionSpec =
            serde_yaml::from_str("version: \"3.1\"\nsrc: github\nvcs_user: forked\n").unwrap();
        assert_eq!(
            spec.clone_url("akismet", &github()),
            "https://github.com/forked/akismet.git"
        );
    }

    #[test]
    fn tag_url_points_at_versioned_tag() {
        let spec: ExtensionSpec = serde_yaml::from_str("version: \"4.0\"\n").unwrap();
        assert_eq!(
            spec.tag_url("jetpack"),
            "http://plugins.svn.wordpress.org/jetpack/tags/4.0/"
        );
    }

    #[test]
    fn src_false_means_no_source() {
        let spec: ExtensionSpec =
            serde_yaml::from_str("version: \"4.0\"\nsrc: false\n").unwrap();
        assert!(spec.src.is_none());
    }

    #[test]
    fn src_absent_means_no_source() {
        let spec: ExtensionSpec = serde_yaml::from_str("version: \"4.0\"\n").unwrap();
        assert!(spec.src.is_none());
    }

    #[test]
    fn src_true_is_rejected() {
        let result: Result<ExtensionSpec, _> = serde_yaml::from_str("version: \"4.0\"\nsrc: true\n");
        assert!(result.is_err());
    }
}
