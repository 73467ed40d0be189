use serde::Deserialize;

/// A named source registry entry from the `VCS` section.
#[derive(Debug, Clone, Deserialize)]
pub struct VcsOrigin {
    /// Base URL the clone URL is built from.
    pub url: String,
    /// Default origin user when an extension does not override it.
    pub user: String,
}
