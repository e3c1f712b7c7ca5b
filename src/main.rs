//! Rulebook - static rules pages for the Old World builder.

mod cli;
mod config;
mod embed;
mod logger;
mod model;
mod registry;
mod render;
mod source;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::RulebookConfig;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = RulebookConfig::load(&cli.config)?;

    match logger::init_file_log(&config.log.dir) {
        Ok(path) => debug!("log"; "writing to {}", path.display()),
        Err(e) => log!("warning"; "cannot open log dir {}: {}", config.log.dir.display(), e),
    }

    match &cli.command {
        Commands::Fetch { args } => cli::fetch::run_fetch(&config, args)?,
        Commands::Patch { dirs } => {
            cli::patch::run_patch(&config, dirs)?;
        }
    }

    if let Some(path) = logger::current_log_file() {
        log!("done"; "see log: {}", path.display());
    }
    Ok(())
}
