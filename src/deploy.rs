//! Per-host provisioning driver.
//!
//! One host runs through a fixed sequence: stage a build copy, converge
//! WordPress core, reconcile plugins and themes, then either promote the
//! staged build over the live tree or abort and leave the staging copy
//! behind for inspection. Hosts are processed strictly one after another;
//! an aborted host never blocks the rest of the fleet.

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::config::extension::ExtensionKind;
use crate::config::server::ServerEntry;
use crate::logging::Logger;
use crate::reconcile::Reconciler;
use crate::remote::Session;

/// Remote staging directory. Shared across invocations, so concurrent runs
/// against the same host must be serialized by the operator.
pub const BUILD_DIR: &str = "/tmp/build";

/// Terminal state of one host's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOutcome {
    /// The staged build was promoted over the live tree.
    Committed,
    /// Reconciliation failures kept the staged build from being promoted.
    Aborted,
}

/// Result of one host's provisioning run. Created fresh per run and
/// discarded once reported.
#[derive(Debug)]
pub struct DeploymentReport {
    pub host: String,
    pub outcome: HostOutcome,
    /// Identifiers of extensions that failed to reconcile.
    pub failures: Vec<String>,
}

/// Provision a single host against the staged build directory.
///
/// # Errors
///
/// Returns an error when staging or the core install fails; the caller
/// records the host as aborted. Reconciliation failures are not errors:
/// they are collected in the report and decide promotion.
pub fn provision_host(
    session: &dyn Session,
    config: &Config,
    host: &str,
    server: &ServerEntry,
    only: Option<ExtensionKind>,
    log: &Logger,
) -> Result<DeploymentReport> {
    log.stage(&format!("Staging build for {host}"));
    session
        .sudo("/", &format!("cp -R {} {BUILD_DIR}", server.wordpress))
        .context("staging the live tree")?;

    log.stage("Installing WordPress core");
    install_core(session, config, server, log).context("installing WordPress core")?;

    let mut failures = Vec::new();
    if config.plugins.is_empty() && config.themes.is_empty() {
        log.debug("no plugins or themes declared, nothing to reconcile");
    } else {
        log.stage("Reconciling extensions");
        let reconciler = Reconciler::new(session, config, log, BUILD_DIR);
        if only != Some(ExtensionKind::Theme) && !config.plugins.is_empty() {
            failures.extend(reconciler.sync_all(ExtensionKind::Plugin));
        }
        if only != Some(ExtensionKind::Plugin) && !config.themes.is_empty() {
            failures.extend(reconciler.sync_all(ExtensionKind::Theme));
        }
    }

    finalize(session, host, server, failures, log)
}

/// Converge WordPress core onto the pinned version and lay down the host's
/// configuration. Any failure here aborts the host: proceeding to extension
/// work on top of a half-installed core only compounds the damage.
fn install_core(
    session: &dyn Session,
    config: &Config,
    server: &ServerEntry,
    log: &Logger,
) -> Result<()> {
    let version = &config.wordpress_version;
    let current = session.try_run(BUILD_DIR, "wp core version")?;
    if current.success && current.value() == version {
        log.info(&format!("WordPress {version} is okay"));
    } else {
        session.sudo(
            BUILD_DIR,
            &format!("wp core download --version={version} --allow-root"),
        )?;
        log.info("WordPress installed successfully, moving on to configuration");
    }

    session.sudo(BUILD_DIR, &format!("cp {} wp-config.php", server.wp_config))?;
    session.sudo(
        BUILD_DIR,
        &format!("cp -R {} configurations", server.extra_config),
    )?;
    session.sudo(BUILD_DIR, "chmod -R +x configurations")?;
    session.sudo(BUILD_DIR, r"find . -iname \*.php | xargs chmod +x")?;
    log.info("WordPress fully configured");
    Ok(())
}

/// Promote the staged build, or report failures and leave it in place.
fn finalize(
    session: &dyn Session,
    host: &str,
    server: &ServerEntry,
    failures: Vec<String>,
    log: &Logger,
) -> Result<DeploymentReport> {
    if failures.is_empty() {
        log.info("All done, ready to copy");
        session
            .sudo("/", &format!("cp -R {BUILD_DIR} {}", server.wordpress))
            .context("promoting the staged build")?;
        session
            .sudo("/", &format!("rm -rf {BUILD_DIR}"))
            .context("removing the staging directory")?;
        return Ok(DeploymentReport {
            host: host.to_string(),
            outcome: HostOutcome::Committed,
            failures,
        });
    }

    // The staging directory is deliberately left behind for inspection.
    log.error("The following extensions failed to update:");
    for id in &failures {
        log.error(id);
    }
    Ok(DeploymentReport {
        host: host.to_string(),
        outcome: HostOutcome::Aborted,
        failures,
    })
}
