use serde::Deserialize;

/// One target host as declared in the `Servers` section.
///
/// All paths are remote paths on the target, so they stay plain strings
/// rather than `PathBuf`s. The entry is read-only for the duration of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    /// Login user for the SSH session.
    pub user: String,
    /// SSH port, when not the default.
    #[serde(default)]
    pub port: Option<u16>,
    /// Path of the live WordPress tree.
    pub wordpress: String,
    /// Directory containing the wp-cli binary; absence is fatal at deploy time.
    #[serde(rename = "wp-cli", default)]
    pub wp_cli: Option<String>,
    /// Path of the wp-config.php template to copy into the build.
    #[serde(rename = "wp-config")]
    pub wp_config: String,
    /// Directory of extra configuration assets copied alongside the config.
    #[serde(rename = "extra-config")]
    pub extra_config: String,
    /// Account privileged commands run as on the target.
    pub sudo_user: String,
}
