//! Connection descriptors and credential resolution.
//!
//! The configuration is turned into an ordered list of [`HostTarget`]s by a
//! plain function; nothing is accumulated into ambient state at load time.
//! Credentials come from a fixed local-development pair for vagrant hosts and
//! from the environment (`<host>_pass`) for everything else.

use crate::config::Config;
use crate::error::ConfigError;

/// Host-string prefix that selects the fixed local-development credentials.
const LOCAL_PREFIX: &str = "vagrant";

/// Loopback address substituted for local-development hosts.
const LOCAL_ADDR: &str = "127.0.0.1";

/// One resolved connection descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    /// Host address, the key of the `Servers` entry.
    pub host: String,
    /// Login user.
    pub user: String,
    /// SSH port, when not the default.
    pub port: Option<u16>,
}

impl HostTarget {
    /// Render as `user@host[:port]`.
    #[must_use]
    pub fn host_string(&self) -> String {
        self.port.map_or_else(
            || format!("{}@{}", self.user, self.host),
            |port| format!("{}@{}:{port}", self.user, self.host),
        )
    }
}

/// Login credentials for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub host: String,
    pub password: String,
}

/// The ordered list of connection descriptors declared in the document.
#[must_use]
pub fn targets(config: &Config) -> Vec<HostTarget> {
    config
        .servers
        .iter()
        .map(|(host, entry)| HostTarget {
            host: host.clone(),
            user: entry.user.clone(),
            port: entry.port,
        })
        .collect()
}

/// Split a `user@host[:port]` string back into a [`HostTarget`].
///
/// # Errors
///
/// Returns [`ConfigError::BadHostString`] when the string has no `@`, an
/// empty component, or a non-numeric port.
pub fn parse_host_string(s: &str) -> Result<HostTarget, ConfigError> {
    let bad = || ConfigError::BadHostString(s.to_string());
    let (user, rest) = s.split_once('@').ok_or_else(bad)?;
    if user.is_empty() || rest.is_empty() {
        return Err(bad());
    }
    let (host, port) = match rest.split_once(':') {
        Some((host, port)) => {
            let port: u16 = port.parse().map_err(|_| bad())?;
            (host, Some(port))
        }
        None => (rest, None),
    };
    if host.is_empty() {
        return Err(bad());
    }
    Ok(HostTarget {
        host: host.to_string(),
        user: user.to_string(),
        port,
    })
}

/// Resolve login credentials for a host string.
///
/// Host strings beginning with the local-development prefix always map to the
/// fixed vagrant pair on the loopback address; any `<host>_pass` variable in
/// the environment is ignored for them. All other hosts read their password
/// from `<host>_pass`, keyed by the host address.
///
/// # Errors
///
/// Returns [`ConfigError::BadHostString`] for a malformed host string and
/// [`ConfigError::MissingPassword`] when no password variable is set.
pub fn resolve_credentials(host_string: &str) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(host_string, |key| std::env::var(key).ok())
}

/// [`resolve_credentials`] with an injectable environment lookup.
pub fn resolve_credentials_with(
    host_string: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    if host_string.starts_with(LOCAL_PREFIX) {
        return Ok(Credentials {
            user: LOCAL_PREFIX.to_string(),
            host: LOCAL_ADDR.to_string(),
            password: LOCAL_PREFIX.to_string(),
        });
    }

    let target = parse_host_string(host_string)?;
    let key = format!("{}_pass", target.host);
    let password = env(&key).ok_or_else(|| ConfigError::MissingPassword {
        host: target.host.clone(),
    })?;
    Ok(Credentials {
        user: target.user,
        host: target.host,
        password,
    })
}
