use anyhow::Result;
use clap::Parser;

use gopack::build::ShellRunner;
use gopack::cli::{Cli, Command};
use gopack::{config, pack};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Pack(args) => {
            init_tracing(args.quiet, args.debug);
            let file = config::load(&args.config)?;
            let cfg = config::PackConfig::resolve(file, &args)?;
            pack::run(&cfg, &ShellRunner)
        }
    }
}

fn init_tracing(quiet: bool, debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
