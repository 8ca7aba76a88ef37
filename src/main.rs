use anyhow::Result;
use clap::Parser;

use dotfiles_bundle_cli::cli::{Cli, Command};
use dotfiles_bundle_cli::{commands, logging};

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new(args.verbose);

    match args.command {
        Command::Build(opts) => commands::build::run(&args.global, &opts, &log),
        Command::List => commands::list::run(&args.global, &log),
        Command::Version => {
            let version = env!("CARGO_PKG_VERSION");
            println!("dotfiles-bundle {version}");
            Ok(())
        }
    }
}
