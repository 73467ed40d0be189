//! Domain-specific error types for the fleet provisioner.
//!
//! Internal modules return typed errors ([`ConfigError`], [`RemoteError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! The split mirrors the failure taxonomy of a deployment run: configuration
//! and credential problems are fatal to the whole run, while a rejected
//! remote command is caught per extension and recorded in the run's failure
//! list instead of aborting sibling work.

use thiserror::Error;

/// Errors that arise from loading and interpreting the fleet document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML or has a malformed entry.
    #[error("Invalid YAML in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required top-level section is absent from the document.
    #[error("Missing required section `{0}`")]
    MissingSection(&'static str),

    /// An extension kind string was neither "plugin" nor "theme".
    #[error("Unknown extension kind '{0}': must be plugin or theme")]
    UnknownExtensionKind(String),

    /// The host entry has no wp-cli tool path configured.
    #[error("No wp-cli path configured for {host}; install wp-cli, it's damn handy")]
    MissingWpCli {
        /// Address of the host missing the tool.
        host: String,
    },

    /// A host string could not be split into user and address.
    #[error("Malformed host string '{0}': expected user@host[:port]")]
    BadHostString(String),

    /// No login password could be resolved for the host.
    #[error("No password for {host}: set the {host}_pass environment variable")]
    MissingPassword {
        /// Address of the host missing credentials.
        host: String,
    },

    /// A host named on the command line is not in the Servers section.
    #[error("Host '{0}' is not declared in the Servers section")]
    UnknownHost(String),
}

/// Errors that arise from executing commands on a remote host.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The local SSH client process could not be started.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Local program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The remote shell rejected a command.
    #[error("remote command failed (exit {code}): {command}: {stderr}")]
    CommandFailed {
        /// The command string as sent to the remote shell.
        command: String,
        /// Remote exit code, `-1` if the process was killed by a signal.
        code: i32,
        /// Trimmed stderr from the remote shell.
        stderr: String,
    },

    /// A required local client tool is not on PATH.
    #[error("required local tool '{0}' not found on PATH")]
    MissingLocalTool(String),
}
