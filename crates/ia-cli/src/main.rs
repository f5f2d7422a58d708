use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ia_cli::commands::record::Stat;
use ia_cli::commands::{errors, record, replay, status};
use ia_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    // Stat traces are emitted at info level, so verbose_logging raises the default
    let default_level = if config.verbose_logging { "info" } else { "warn" };
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
    tracing::debug!(?config, "loaded configuration");

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut stdout = io::stdout().lock();

    match command {
        Commands::Gain { identifier, value } => {
            record::run(&mut stdout, &config, &Stat::Gain { identifier, value })?;
        }
        Commands::Loss { identifier, value } => {
            record::run(&mut stdout, &config, &Stat::Loss { identifier, value })?;
        }
        Commands::Custom {
            identifier,
            value,
            measurement,
            formula,
            target,
        } => {
            let stat = Stat::Custom {
                identifier,
                value,
                measurement,
                formula,
                target,
            };
            record::run(&mut stdout, &config, &stat)?;
        }
        Commands::Keyword { keyword, target } => {
            record::run(&mut stdout, &config, &Stat::Keyword { keyword, target })?;
        }
        Commands::Gesture {
            identifier,
            hold_length,
            kind,
            target,
        } => {
            let stat = Stat::Gesture {
                identifier,
                hold_length,
                kind,
                target,
            };
            record::run(&mut stdout, &config, &stat)?;
        }
        Commands::Replay { script } => replay::run(&mut stdout, &config, &script)?,
        Commands::Status => status::run(&mut stdout, &config)?,
        Commands::Error { code } => errors::run_code(&mut stdout, &config, code)?,
        Commands::LastError => errors::run_last(&mut stdout, &config)?,
    }

    Ok(())
}
