mod apt;
mod cli;
mod commands;
mod config;
mod launch;
mod paths;
mod progress;
mod steps;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, RunArgs};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use apt::AptPackageManager;
use config::BootstrapConfig;
use fetchkit::HttpFetcher;
use progress::BarProgress;
use steps::StepContext;
use ui::ConsoleReporter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => with_context(cli.config, cli.quiet, |ctx, _| {
            let outcome = commands::bootstrap::run(ctx, args.plain)?;
            Ok(ExitCode::from(outcome.exit_code()))
        }),
        Command::Doctor => with_context(cli.config, cli.quiet, |ctx, config_file| {
            commands::doctor::run(ctx, config_file)?;
            Ok(ExitCode::SUCCESS)
        }),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "nyxboot", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load configuration, build the real collaborators and hand them to `f`
fn with_context<T>(
    config: Option<PathBuf>,
    quiet: bool,
    f: impl FnOnce(&StepContext<'_>, Option<&Path>) -> Result<T>,
) -> Result<T> {
    let config_file = BootstrapConfig::locate(config.as_deref())?;
    let config = BootstrapConfig::load(config_file.as_deref())?;

    let platform = fetchkit::platform::detect();
    log::debug!("detected {platform:?}");

    let packages = AptPackageManager::new(config.system.apt_paths.clone(), config.system.sudo);
    let fetcher = HttpFetcher::new(Arc::new(BarProgress::new(quiet)));
    let reporter = ConsoleReporter::new(quiet);

    let ctx = StepContext {
        config: &config,
        platform: &platform,
        packages: &packages,
        fetcher: &fetcher,
        reporter: &reporter,
    };
    f(&ctx, config_file.as_deref())
}
