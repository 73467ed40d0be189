use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::hosts;

/// Print the resolved connection descriptors without touching any host.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = Config::load(&global.config)
        .with_context(|| format!("loading {}", global.config.display()))?;

    for target in hosts::targets(&config) {
        let server = &config.servers[&target.host];
        println!("{}  wordpress={}", target.host_string(), server.wordpress);
    }
    Ok(())
}
