//! `dircert config` - configuration file management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => show_path(ctx),
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Init { force } => init_config(ctx, force),
    }
}

fn show_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path()?.display());
    Ok(())
}

fn show_config(ctx: &Context) -> Result<()> {
    let path = ctx.config_path()?;
    let config = Config::load(&path)?.masked();

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Pretty => {
            println!("{} {}", "Configuration:".bold(), path.display());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);

            if let Err(e) = config.validate() {
                println!();
                println!("{} {e}", "Warning:".yellow().bold());
            }
        }
    }

    Ok(())
}

fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx.config_path()?;
    Config::write_starter(&path, force)?;

    println!(
        "{} Wrote starter configuration to {}",
        "Success:".green().bold(),
        path.display().to_string().cyan()
    );
    println!("Edit [directory] server and search_base_dns before running an audit.");
    Ok(())
}
