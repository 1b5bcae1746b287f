//! plugincat -- audio plugin cataloguer.
//!
//! Thin binary entry point. All scanning and catalog logic lives in the
//! `plugincat-core` crate; this file parses arguments and sets up logging.

mod cli;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so listings on stdout stay pipeable.
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("plugincat starting");

    cli::run(args)
}
