// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Lunch & Learn CLI
//!
//! ## Commands
//!
//! - `lunchlearn config show|validate|generate` - Configuration management
//! - `lunchlearn demo` - Run a scripted training lifecycle on the in-memory stack
//! - `lunchlearn status check <FROM> <TO>|table` - Inspect the status state machine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use lunchlearn_cli::commands::{self, ConfigCommand, DemoArgs, StatusCommand};

/// Lunch & Learn - training catalogue backend tooling
#[derive(Parser)]
#[command(name = "lunchlearn")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "LUNCHLEARN_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LUNCHLEARN_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Run a scripted training lifecycle against in-memory services
    #[command(name = "demo")]
    Demo {
        #[command(flatten)]
        args: DemoArgs,
    },

    /// Training status state machine
    #[command(name = "status")]
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Demo { args }) => commands::demo::execute(args, cli.config).await,
        Some(Commands::Status { command }) => commands::status::handle_command(command),
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
