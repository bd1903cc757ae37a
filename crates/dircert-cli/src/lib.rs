//! # dircert-cli
//!
//! Command-line front end for the directory certificate auditor.
//!
//! ## Features
//!
//! - **Audit**: search every configured base DN, pick the latest certificate
//!   per entry, classify it and write `certificates.csv`
//! - **Mail**: send the report through SMTP when `[mail]` is configured
//! - **Config**: TOML file in the platform config directory, with
//!   `dircert config path|show|init`

pub mod cli;
pub mod config;
pub mod logging;
pub mod notify;
pub mod output;

pub use cli::run;
