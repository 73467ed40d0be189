//! Per-extension version reconciliation.
//!
//! For every declared plugin or theme the reconciler observes the staged
//! build (install path, presence, installed version, activation state) and
//! applies the smallest remote mutation that converges it onto the pinned
//! version: a fresh install, a single checkout, or nothing. A failure while
//! reconciling one extension is recorded by identifier and never aborts the
//! rest of the batch.

use std::cmp::Ordering;

use anyhow::{Context as _, Result, bail};

use crate::config::Config;
use crate::config::extension::{ExtensionKind, ExtensionSpec};
use crate::logging::Logger;
use crate::remote::Session;

/// Reconciles the declared extensions of one host against its staged build.
pub struct Reconciler<'a> {
    session: &'a dyn Session,
    config: &'a Config,
    log: &'a Logger,
    build_dir: &'a str,
}

/// Compare an installed version against the desired one.
///
/// This is plain lexical string ordering, not a semantic-version compare:
/// `"2.0"` sorts *after* `"10.0"`. Pinned versions in the wild rely on this
/// ordering, so changing it to a numeric compare would alter which direction
/// a convergence is reported as.
#[must_use]
pub fn compare_versions(installed: &str, desired: &str) -> Ordering {
    installed.cmp(desired)
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub const fn new(
        session: &'a dyn Session,
        config: &'a Config,
        log: &'a Logger,
        build_dir: &'a str,
    ) -> Self {
        Self {
            session,
            config,
            log,
            build_dir,
        }
    }

    /// Reconcile every declared extension of `kind`, returning the
    /// identifiers that failed. Failures are isolated per extension.
    pub fn sync_all(&self, kind: ExtensionKind) -> Vec<String> {
        let mut failures = Vec::new();
        for (id, spec) in self.config.extensions(kind) {
            if let Err(e) = self.sync_one(kind, id, spec) {
                self.log.error(&format!("Failed to update {id}: {e:#}"));
                failures.push(id.clone());
            }
        }
        failures
    }

    /// Converge a single extension onto its pinned version and activate it.
    fn sync_one(&self, kind: ExtensionKind, id: &str, spec: &ExtensionSpec) -> Result<()> {
        let path = self
            .session
            .run(self.build_dir, &format!("wp {kind} path {id}"))?
            .value()
            .to_string();
        let ext_dir = path
            .rsplit_once('/')
            .map_or(path.as_str(), |(dir, _)| dir)
            .to_string();

        let probe = self
            .session
            .try_run(self.build_dir, &format!("wp {kind} is-installed {id}"))?;
        if !probe.success {
            self.install(kind, id, spec, &ext_dir)?;
        }

        let installed = self
            .session
            .run(self.build_dir, &format!("wp {kind} get {id} --field=version"))?
            .value()
            .to_string();

        match compare_versions(&installed, &spec.version) {
            Ordering::Equal => self.log.info(&format!("{kind} {id} is okay")),
            Ordering::Greater => {
                self.log
                    .info(&format!("downgrading {kind} {id} {installed} -> {}", spec.version));
                self.checkout_version(kind, id, spec, &ext_dir)?;
            }
            Ordering::Less => {
                self.log
                    .info(&format!("upgrading {kind} {id} {installed} -> {}", spec.version));
                self.checkout_version(kind, id, spec, &ext_dir)?;
            }
        }

        self.ensure_active(kind, id)
    }

    /// Install an absent extension: clone its repository, or pull the pinned
    /// tag from the public archive when it has no VCS source.
    fn install(
        &self,
        kind: ExtensionKind,
        id: &str,
        spec: &ExtensionSpec,
        ext_dir: &str,
    ) -> Result<()> {
        let content_dir = format!("{}/{}", self.build_dir, kind.content_dir());
        if let Some(src) = &spec.src {
            let Some(origin) = self.config.vcs.get(src) else {
                bail!("unknown VCS source `{src}`");
            };
            // The clone may already exist from an earlier aborted run; the
            // checkout below converges it either way.
            self.session
                .try_sudo(&content_dir, &format!("git clone {}", spec.clone_url(id, origin)))?;
            self.checkout_version(kind, id, spec, ext_dir)
                .context("checking out pinned version after clone")
        } else {
            self.session
                .sudo(&content_dir, &format!("svn co --force {} {id}", spec.tag_url(id)))?;
            Ok(())
        }
    }

    /// Check out the pinned version. Upgrades and downgrades are the same
    /// operation; the direction only matters for reporting.
    fn checkout_version(
        &self,
        kind: ExtensionKind,
        id: &str,
        spec: &ExtensionSpec,
        ext_dir: &str,
    ) -> Result<()> {
        if spec.src.is_some() {
            self.session.sudo(ext_dir, "git stash")?;
            self.session.sudo(ext_dir, "git fetch origin")?;
            self.session
                .sudo(ext_dir, &format!("git checkout origin/{}", spec.version))?;
        } else {
            let content_dir = format!("{}/{}", self.build_dir, kind.content_dir());
            self.session
                .sudo(&content_dir, &format!("svn co --force {} {id}", spec.tag_url(id)))?;
        }
        Ok(())
    }

    /// Activate the extension when it is not already active.
    ///
    /// Themes have no status field; activation is inferred from the active
    /// template option instead.
    fn ensure_active(&self, kind: ExtensionKind, id: &str) -> Result<()> {
        let active = match kind {
            ExtensionKind::Theme => {
                self.session
                    .run(self.build_dir, "wp option get template")?
                    .value()
                    == id
            }
            ExtensionKind::Plugin => {
                self.session
                    .run(self.build_dir, &format!("wp plugin get {id} --field=status"))?
                    .value()
                    == "active"
            }
        };
        if !active {
            self.session
                .run(self.build_dir, &format!("wp {kind} activate {id}"))?;
        }
        Ok(())
    }
}
