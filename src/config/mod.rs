//! Typed views over the fleet configuration document.
//!
//! One YAML document describes the whole fleet: `Servers`, `VCS`,
//! `Plugins`, `Themes` and the pinned `Application` versions. `Servers`,
//! `VCS` and `Application` are required; an absent `Plugins` or `Themes`
//! section just means there is nothing of that kind to reconcile.

pub mod extension;
pub mod server;
pub mod vcs;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use self::extension::{ExtensionKind, ExtensionSpec};
use self::server::ServerEntry;
use self::vcs::VcsOrigin;

/// Raw document shape as it appears on disk.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "Servers")]
    servers: Option<BTreeMap<String, ServerEntry>>,
    #[serde(rename = "VCS")]
    vcs: Option<BTreeMap<String, VcsOrigin>>,
    #[serde(rename = "Plugins")]
    plugins: Option<BTreeMap<String, ExtensionSpec>>,
    #[serde(rename = "Themes")]
    themes: Option<BTreeMap<String, ExtensionSpec>>,
    #[serde(rename = "Application")]
    application: Option<Application>,
}

#[derive(Debug, Deserialize)]
struct Application {
    #[serde(rename = "WordPress")]
    wordpress: WordPress,
}

#[derive(Debug, Deserialize)]
struct WordPress {
    version: String,
}

/// All loaded configuration for a deployment run.
///
/// `BTreeMap` keeps host and extension iteration order deterministic, so a
/// run always visits targets and issues remote commands in the same order.
#[derive(Debug)]
pub struct Config {
    pub servers: BTreeMap<String, ServerEntry>,
    pub vcs: BTreeMap<String, VcsOrigin>,
    pub plugins: BTreeMap<String, ExtensionSpec>,
    pub themes: BTreeMap<String, ExtensionSpec>,
    /// Pinned WordPress core version for every host.
    pub wordpress_version: String,
}

impl Config {
    /// Load and validate the fleet document at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not valid
    /// YAML, or is missing one of the required sections.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content, &path.display().to_string())
    }

    /// Parse a fleet document from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or missing a
    /// required section.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let doc: Document =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;

        let servers = doc.servers.ok_or(ConfigError::MissingSection("Servers"))?;
        let vcs = doc.vcs.ok_or(ConfigError::MissingSection("VCS"))?;
        let application = doc
            .application
            .ok_or(ConfigError::MissingSection("Application"))?;

        Ok(Self {
            servers,
            vcs,
            plugins: doc.plugins.unwrap_or_default(),
            themes: doc.themes.unwrap_or_default(),
            wordpress_version: application.wordpress.version,
        })
    }

    /// The declared extensions of the given kind.
    #[must_use]
    pub const fn extensions(&self, kind: ExtensionKind) -> &BTreeMap<String, ExtensionSpec> {
        match kind {
            ExtensionKind::Plugin => &self.plugins,
            ExtensionKind::Theme => &self.themes,
        }
    }
}
