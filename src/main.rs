use anyhow::Result;
use clap::Parser;

use wpfleet_cli::{cli, commands, deploy, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init(args.verbose);
    let log = logging::Logger::new();

    // An interrupted run leaves the remote staging copy behind; tell the
    // operator where to look rather than dying silently.
    ctrlc::set_handler(|| {
        eprintln!(
            "\nwpfleet: interrupted; a staging copy may remain at {} on the target host",
            deploy::BUILD_DIR
        );
        std::process::exit(130);
    })?;

    match args.command {
        cli::Command::Deploy(opts) => commands::deploy::run(&args.global, &opts, &log),
        cli::Command::Targets => commands::targets::run(&args.global),
        cli::Command::Version => {
            let version = option_env!("WPFLEET_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("wpfleet {version}");
            Ok(())
        }
    }
}
