mod capacity;
mod cli;
mod commands;
mod config;
mod copier;
mod paths;
mod progress;
mod prompt;
mod snapshot;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::RunConfig;
use std::io;

fn main() -> Result<()> {
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

    match cli.command {
        Command::Run => {
            let cfg = RunConfig::resolve(cli.source.as_deref(), cli.destination.as_deref())?;
            commands::run::run(&cfg)
        }
        Command::Hash { dir } => commands::hash::run(&dir),
        Command::Verify {
            source_dir,
            dest_dir,
        } => commands::verify::run(&source_dir, &dest_dir),
        Command::Status => {
            let cfg = RunConfig::resolve(cli.source.as_deref(), cli.destination.as_deref())?;
            commands::status::run(&cfg)
        }
        Command::Evict { yes } => {
            let cfg = RunConfig::resolve(cli.source.as_deref(), cli.destination.as_deref())?;
            commands::evict::run(&cfg, yes)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "snapsync", &mut io::stdout());
            Ok(())
        }
    }
}
