// Shared helpers for integration tests.
//
// Provides a scripted stand-in for the SSH session plus a canonical fleet
// document, so each integration test can drive a full provisioning run
// without a live host and assert on the exact remote-command transcript.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::sync::Mutex;

use wpfleet_cli::error::RemoteError;
use wpfleet_cli::remote::{ExecResult, Session};

/// Canned response for one command rule.
pub enum Response {
    /// Succeed with the given stdout.
    Ok(&'static str),
    /// Exit non-zero.
    Fail,
}

/// A [`Session`] that answers from a rule table and records every command.
///
/// Rules match on a substring of the command; the first match wins and
/// unmatched commands succeed with empty output. The transcript records each
/// call as `<mode> <dir>$ <command>`.
pub struct ScriptedSession {
    rules: Vec<(&'static str, Response)>,
    transcript: Mutex<Vec<String>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Add a rule: commands containing `needle` get `response`.
    #[must_use]
    pub fn on(mut self, needle: &'static str, response: Response) -> Self {
        self.rules.push((needle, response));
        self
    }

    /// Every recorded command line, in execution order.
    pub fn transcript(&self) -> Vec<String> {
        self.transcript.lock().expect("transcript poisoned").clone()
    }

    fn record(&self, mode: &str, dir: &str, command: &str) {
        self.transcript
            .lock()
            .expect("transcript poisoned")
            .push(format!("{mode} {dir}$ {command}"));
    }

    fn lookup(&self, command: &str) -> ExecResult {
        for (needle, response) in &self.rules {
            if command.contains(needle) {
                return match response {
                    Response::Ok(stdout) => ok_result(stdout),
                    Response::Fail => fail_result(),
                };
            }
        }
        ok_result("")
    }
}

/// Convert a non-zero exit into the error the production session returns.
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

impl Session for ScriptedSession {
    fn run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.record("run", dir, command);
        checked(self.lookup(command), command)
    }

    fn sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.record("sudo", dir, command);
        checked(self.lookup(command), command)
    }

    fn try_run(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.record("try", dir, command);
        Ok(self.lookup(command))
    }

    fn try_sudo(&self, dir: &str, command: &str) -> Result<ExecResult, RemoteError> {
        self.record("try-sudo", dir, command);
        Ok(self.lookup(command))
    }
}

/// A successful [`ExecResult`] with the given stdout.
pub fn ok_result(stdout: &str) -> ExecResult {
    ExecResult {
        stdout: format!("{stdout}\n"),
        stderr: String::new(),
        success: true,
        code: Some(0),
    }
}

/// A failed [`ExecResult`].
pub fn fail_result() -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: "remote: rejected".to_string(),
        success: false,
        code: Some(1),
    }
}

/// Canonical fleet document used across the integration tests: one host, a
/// VCS-sourced plugin, a tag-archive plugin and one theme.
pub const FLEET_YAML: &str = r#"
Servers:
  10.0.0.5:
    user: deploy
    wordpress: /var/www/wordpress
    wp-cli: /usr/local/bin
    wp-config: /etc/wpfleet/wp-config.php
    extra-config: /etc/wpfleet/extra
    sudo_user: www-data
VCS:
  github:
    url: https://github.com
    user: acme
Plugins:
  akismet:
    version: "3.1"
    src: github
  jetpack:
    version: "4.0"
    src: false
Themes:
  twentysixteen:
    version: "1.1"
Application:
  WordPress:
    version: "4.4"
"#;

/// `FLEET_YAML` parsed into a [`wpfleet_cli::config::Config`].
pub fn fleet_config() -> wpfleet_cli::config::Config {
    wpfleet_cli::config::Config::from_yaml(FLEET_YAML, "test").expect("valid fleet document")
}

/// The host entry of the canonical document.
pub fn fleet_server(
    config: &wpfleet_cli::config::Config,
) -> wpfleet_cli::config::server::ServerEntry {
    config.servers["10.0.0.5"].clone()
}
