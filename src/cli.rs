use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles bundler.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles-bundle",
    about = "Packages a dotfiles repository into installable tarball bundles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the dotfiles repository root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a bundle archive
    Build(BuildOpts),
    /// List available bundles
    List,
    /// Print version information
    Version,
}

/// Options for the `build` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct BuildOpts {
    /// Name of the bundle to build
    pub bundle: String,

    /// Archive output path (default: dist/<bundle>.tar.gz)
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}
