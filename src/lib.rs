//! WordPress fleet provisioning engine.
//!
//! Reads a declarative YAML document describing servers, plugins, themes and
//! version-control sources, then drives each target host over an SSH session
//! to converge WordPress core and extensions onto their pinned versions. All
//! mutations happen against a staged copy of the site which is promoted only
//! when every extension reconciled cleanly.
//!
//! The public API is organised into five layers:
//!
//! - **[`config`]** — parse and validate the YAML fleet document
//! - **[`hosts`]** — turn the document into connection descriptors and credentials
//! - **[`remote`]** — the SSH command session (injectable for testing)
//! - **[`reconcile`]** — per-extension version reconciliation
//! - **[`deploy`]** / **[`commands`]** — per-host provisioning and CLI orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod hosts;
pub mod logging;
pub mod reconcile;
pub mod remote;
