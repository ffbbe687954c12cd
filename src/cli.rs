use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::paths;

#[derive(Parser)]
#[command(name = "nyxboot")]
#[command(version)]
#[command(about = "Guided setup for the NyxBot Warframe bot on Debian-family Linux", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/nyxboot/config.toml)
    #[arg(long, global = true, env = paths::ENV_CONFIG_FILE, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check the machine, install what is missing and launch NyxBot (default)
    Run(RunArgs),

    /// Report what the bootstrap would change, without changing anything
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Ask questions as plain lines instead of interactive menus
    #[arg(long)]
    pub plain: bool,
}
