//! CLI, configuration, secret resolution and command handlers
//!
//! This crate provides the `calendly` command-line interface over
//! [`calendly_api`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod secret;

pub use cli::Cli;
pub use error::{CliError, CliResult};
