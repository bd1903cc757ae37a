//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Audit certificate expiry dates stored in an LDAP directory
///
/// Searches each configured base DN for entries carrying `userCertificate`,
/// picks the latest certificate per entry and writes a CSV report marking
/// EXPIRED and EXPIRING certificates. Running without a subcommand is the
/// same as `dircert run`.
#[derive(Parser, Debug)]
#[command(name = "dircert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: platform config directory)
    #[arg(short, long, env = "DIRCERT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info and per-record echo, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Append log output to this file instead of stderr
    #[arg(long, env = "DIRCERT_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit the directory and write the report
    Run(RunArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

// ============================================================================
// Run command
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Days before expiry at which a certificate is EXPIRING
    #[arg(short, long)]
    pub warning_days: Option<u32>,

    /// Report file to write
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Do not mail the report, even if [mail] is configured
    #[arg(long)]
    pub no_mail: bool,

    /// Directory bind password
    #[arg(long, env = "DIRCERT_LDAP_PASSWORD", hide_env_values = true)]
    pub ldap_password: Option<String>,

    /// SMTP password
    #[arg(long, env = "DIRCERT_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration file location
    Path,

    /// Show the configuration (passwords masked)
    Show,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
