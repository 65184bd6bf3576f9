//! Command-line interface for tablefinder.
//!
//! This module provides the CLI structure for the `tablefinder` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, LookupCommand, ServeCommand};

use crate::config::Config;
use crate::logging::Verbosity;

/// tablefinder - Find your table at the party
///
/// Serves a small page where guests type their name and get their table
/// number, fuzzy-matched against a published spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "tablefinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web server
    Serve(ServeCommand),

    /// Look up one guest against the live sheet
    Lookup(LookupCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    ///
    /// `serve --debug` raises the level to at least verbose.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        };

        match &self.command {
            Command::Serve(serve) if serve.debug => verbosity.at_least(Verbosity::Verbose),
            _ => verbosity,
        }
    }
}

impl ServeCommand {
    /// Apply `--host` / `--port` on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
