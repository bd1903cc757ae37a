//! Command implementations.

pub mod config;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// `--config`, if given
    pub config_path: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,

    /// `-v` count
    pub verbose: u8,
}

impl Context {
    /// Location of the configuration file.
    pub fn config_path(&self) -> Result<PathBuf> {
        Config::resolve_path(self.config_path.as_deref())
    }

    /// Load the configuration file; it must exist.
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_path()?)
    }
}
