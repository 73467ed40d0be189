//! Remote command execution over SSH.
//!
//! Provides the [`Session`] trait so that reconciliation and deployment can
//! be unit-tested without a live host. Production code uses [`SshSession`],
//! which shells out to `ssh` through `sshpass` for password login; tests use
//! the generated `MockSession` or a scripted stand-in.

use std::process::{Command, Output};

use crate::error::RemoteError;
use crate::hosts::Credentials;

/// Result of a remote command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Trimmed stdout, the usual shape for single-value wp-cli queries.
    #[must_use]
    pub fn value(&self) -> &str {
        self.stdout.trim()
    }
}

/// A command session against one remote host.
///
/// `run`/`sudo` fail on a non-zero exit; the `try_` variants return the
/// result regardless of exit status so callers can branch on it (install
/// probes, best-effort clones). All four execute under `dir` with the host's
/// wp-cli directory appended to `PATH`.
#[cfg_attr(test, mockall::automock)]
pub trait Session: Send + Sync {
    /// Run a command, failing if it exits non-zero.
    fn run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError>;

    /// Run a command as the privileged sudo user, failing if it exits non-zero.
    fn sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError>;

    /// Run a command, returning the result even on a non-zero exit.
    fn try_run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError>;

    /// Privileged variant of [`Session::try_run`].
    fn try_sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError>;
}

/// Production [`Session`] over the system `ssh` client.
#[derive(Debug)]
pub struct SshSession {
    creds: Credentials,
    port: Option<u16>,
    sudo_user: String,
    tool_path: String,
}

impl SshSession {
    /// Build a session without touching the system. Use [`SshSession::connect`]
    /// in production so missing client tools surface before the first command.
    #[must_use]
    pub const fn new(
        creds: Credentials,
        port: Option<u16>,
        sudo_user: String,
        tool_path: String,
    ) -> Self {
        Self {
            creds,
            port,
            sudo_user,
            tool_path,
        }
    }

    /// Build a session, verifying the local `ssh` and `sshpass` clients exist.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::MissingLocalTool`] when either client is not on
    /// PATH.
    pub fn connect(
        creds: Credentials,
        port: Option<u16>,
        sudo_user: String,
        tool_path: String,
    ) -> Result<Self, RemoteError> {
        for tool in ["ssh", "sshpass"] {
            which::which(tool).map_err(|_| RemoteError::MissingLocalTool(tool.to_string()))?;
        }
        Ok(Self::new(creds, port, sudo_user, tool_path))
    }

    /// The shell line executed on the remote host for one command.
    fn remote_script(&self, dir: &str, command: &str, privileged: bool) -> String {
        if privileged {
            // sudo resets the environment, so PATH is re-extended inside it.
            let quoted = command.replace('\'', "'\\''");
            format!(
                "cd '{dir}' && sudo -u {} env \"PATH=$PATH:{}\" sh -c '{quoted}'",
                self.sudo_user, self.tool_path
            )
        } else {
            format!(
                "cd '{dir}' && export PATH=\"$PATH:{}\" && {command}",
                self.tool_path
            )
        }
    }

    /// Argument vector for the local `sshpass`/`ssh` invocation.
    fn ssh_args(&self, script: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            self.creds.password.clone(),
            "ssh".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ];
        if let Some(port) = self.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push(format!("{}@{}", self.creds.user, self.creds.host));
        args.push(script.to_string());
        args
    }

    fn execute(&self, dir: &str, command: &str, privileged: bool) -> Result<ExecResult, RemoteError> {
        let script = self.remote_script(dir, command, privileged);
        let output = Command::new("sshpass")
            .args(self.ssh_args(&script))
            .output()
            .map_err(|source| RemoteError::Spawn {
                program: "sshpass".to_string(),
                source,
            })?;
        Ok(ExecResult::from(output))
    }
}

/// Convert a non-zero exit into [`RemoteError::CommandFailed`].
fn checked(result: ExecResult, command: &str) -> Result<ExecResult, RemoteError> {
    if result.success {
        Ok(result)
    } else {
        Err(RemoteError::CommandFailed {
            command: command.to_string(),
            code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        })
    }
}

impl Session for SshSession {
    fn run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        checked(self.execute(dir, command, false)?, command)
    }

    fn sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        checked(self.execute(dir, command, true)?, command)
    }

    fn try_run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.execute(dir, command, false)
    }

    fn try_sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.execute(dir, command, true)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn session() -> SshSession {
        SshSession::new(
            Credentials {
                user: "deploy".to_string(),
                host: "10.0.0.5".to_string(),
                password: "s3cret".to_string(),
            },
            Some(2222),
            "www-data".to_string(),
            "/usr/local/bin".to_string(),
        )
    }

    #[test]
    fn plain_script_extends_path_and_changes_dir() {
        let script = session().remote_script("/tmp/build", "wp core version", false);
        assert_eq!(
            script,
            "cd '/tmp/build' && export PATH=\"$PATH:/usr/local/bin\" && wp core version"
        );
    }

    #[test]
    fn privileged_script_runs_as_sudo_user() {
        let script = session().remote_script("/tmp/build", "chmod -R +x configurations", true);
        assert_eq!(
            script,
            "cd '/tmp/build' && sudo -u www-data env \"PATH=$PATH:/usr/local/bin\" \
             sh -c 'chmod -R +x configurations'"
        );
    }

    #[test]
    fn privileged_script_escapes_single_quotes() {
        let script = session().remote_script("/tmp/build", "echo 'hi'", true);
        assert!(script.contains("echo '\\''hi'\\''"));
    }

    #[test]
    fn ssh_args_include_port_and_login() {
        let args = session().ssh_args("true");
        assert_eq!(args[0], "-p");
        assert_eq!(args[1], "s3cret");
        assert!(args.contains(&"2222".to_string()));
        assert!(args.contains(&"deploy@10.0.0.5".to_string()));
        assert_eq!(args.last().unwrap(), "true");
    }

    #[test]
    fn ssh_args_omit_port_when_default() {
        let mut s = session();
        s.port = None;
        let args = s.ssh_args("true");
        assert!(!args.contains(&"2222".to_string()));
    }

    #[test]
    fn exec_result_value_trims_stdout() {
        let result = ExecResult {
            stdout: "4.4\n".to_string(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        };
        assert_eq!(result.value(), "4.4");
    }
}
