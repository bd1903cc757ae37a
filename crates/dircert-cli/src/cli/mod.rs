//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands, RunArgs};
use clap::Parser;

use crate::logging;

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    logging::init(cli.verbose, cli.log_file.as_deref())?;

    // Create context for commands
    let ctx = commands::Context {
        config_path: cli.config,
        output_format: cli.output.unwrap_or_default(),
        verbose: cli.verbose,
    };

    // Dispatch to appropriate command
    match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(&ctx, args),
        Some(Commands::Config(args)) => commands::config::execute(&ctx, args),
        None => commands::run::execute(&ctx, RunArgs::default()),
    }
}
