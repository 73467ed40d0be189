use anyhow::{Context as _, Result, bail};

use crate::cli::{DeployOpts, GlobalOpts};
use crate::config::Config;
use crate::deploy::{self, HostOutcome};
use crate::error::ConfigError;
use crate::hosts::{self, HostTarget};
use crate::logging::{Logger, StepStatus};
use crate::remote::SshSession;

/// Run the deploy command: provision every configured host in order.
///
/// # Errors
///
/// Returns an error on configuration or credential problems (fatal to the
/// whole run) and when any host ends aborted.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Logger) -> Result<()> {
    let config = Config::load(&global.config)
        .with_context(|| format!("loading {}", global.config.display()))?;

    let targets = select_targets(&config, &opts.limit)?;
    log.info(&format!("{} host(s) to provision", targets.len()));

    for target in targets {
        let server = &config.servers[&target.host];
        // A host without the version-management tool cannot be provisioned
        // at all; treat it as a usage error rather than a host failure.
        let wp_cli = server.wp_cli.clone().ok_or_else(|| ConfigError::MissingWpCli {
            host: target.host.clone(),
        })?;
        let creds = hosts::resolve_credentials(&target.host_string())?;
        let session = SshSession::connect(creds, target.port, server.sudo_user.clone(), wp_cli)?;

        match deploy::provision_host(&session, &config, &target.host, server, opts.only, log) {
            Ok(report) if report.outcome == HostOutcome::Committed => {
                log.record_step(&target.host, StepStatus::Ok, None);
            }
            Ok(report) => {
                let message = format!("{} extension(s) failed", report.failures.len());
                log.record_step(&target.host, StepStatus::Failed, Some(&message));
            }
            Err(e) => {
                log.error(&format!("{}: {e:#}", target.host));
                log.record_step(&target.host, StepStatus::Failed, Some(&format!("{e:#}")));
            }
        }
    }

    log.print_summary();

    if log.has_failures() {
        bail!("one or more hosts aborted");
    }
    Ok(())
}

/// The configured targets, narrowed by `--limit` when given.
fn select_targets(config: &Config, limit: &[String]) -> Result<Vec<HostTarget>, ConfigError> {
    let all = hosts::targets(config);
    if limit.is_empty() {
        return Ok(all);
    }
    for name in limit {
        if !config.servers.contains_key(name) {
            return Err(ConfigError::UnknownHost(name.clone()));
        }
    }
    Ok(all
        .into_iter()
        .filter(|t| limit.contains(&t.host))
        .collect())
}
