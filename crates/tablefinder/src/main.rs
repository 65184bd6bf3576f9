//! `tablefinder` - CLI for the table lookup page
//!
//! This binary runs the web server and provides a few commands for checking
//! the configuration and the live sheet from a terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use tablefinder::cli::{Cli, Command, ConfigCommand, LookupCommand, ServeCommand};
use tablefinder::{init_logging, Config, LookupOutcome, TableFinder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Execute the command; each one loads the configuration it needs
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(load_config(cli.config)?, &serve_cmd).await,
        Command::Lookup(lookup_cmd) => handle_lookup(&load_config(cli.config)?, &lookup_cmd).await,
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate()?;
    tablefinder::web::serve(&config).await?;
    Ok(())
}

async fn handle_lookup(config: &Config, cmd: &LookupCommand) -> anyhow::Result<()> {
    let finder = TableFinder::from_config(config)?;
    let outcome = finder
        .lookup(&cmd.name)
        .await
        .with_context(|| format!("looking up \"{}\"", cmd.name))?;

    let Some(outcome) = outcome else {
        anyhow::bail!("name must not be empty");
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        LookupOutcome::Found { name, table, score } => {
            println!("{name}: table {table} (score {score:.1})");
        }
        LookupOutcome::NotFound => {
            println!("No guest matching \"{}\"", cmd.name.trim());
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Sheet]");
                println!("  CSV URL:            {}", config.sheet.csv_url);
                println!("  Timeout (s):        {}", config.sheet.timeout_secs);
                println!("  Cache (s):          {}", config.sheet.cache_seconds);
                println!("  Name column:        {}", config.sheet.name_column);
                println!("  Table column:       {}", config.sheet.table_column);
                println!(
                    "  Serve stale:        {}",
                    config.sheet.serve_stale_on_error
                );
                println!();
                println!("[Matcher]");
                println!("  Threshold:          {}", config.matcher.threshold);
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.bind_addr());
                println!(
                    "  Static dir:         {}",
                    config.server.static_dir.display()
                );
                println!();
                println!("[Page]");
                println!("  Heading:            {}", config.page.heading);
                println!("  Banner:             {}", config.page.banner_path);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("{} is not a valid configuration", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
