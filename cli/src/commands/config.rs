// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use lunchlearn_core::domain::config::LunchLearnConfig;
use lunchlearn_core::domain::page::{Direction, SortOrder};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./lunchlearn-config.yaml)
        #[arg(short, long, default_value = "./lunchlearn-config.yaml")]
        output: PathBuf,

        /// Fill in sample mail recipients
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = LunchLearnConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. LUNCHLEARN_CONFIG_PATH: {}",
            std::env::var("LUNCHLEARN_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./lunchlearn-config.yaml");
        println!("  4. ~/.lunchlearn/config.yaml");
        println!("  5. /etc/lunchlearn/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Identity:".bold());
    println!("  Name: {}", config.metadata.name);
    if let Some(version) = &config.metadata.version {
        println!("  Version: {}", version);
    }
    println!();

    let collections = &config.spec.collections;
    println!("{}", "Id allocation scopes:".bold());
    println!("  Training: {}", collections.training);
    println!("  Topic:    {}", collections.topic);
    println!("  Comment:  {}", collections.comment);
    println!("  Feedback: {}", collections.feedback);
    println!("  Employee: {}", collections.employee);
    println!();

    let paging = &config.spec.paging;
    println!("{}", "Paging:".bold());
    println!(
        "  Page size: {} (max {})",
        paging.default_page_size, paging.max_page_size
    );
    println!("  Default sort: {}", render_sort(&paging.default_sort));
    println!("  Search sort:  {}", render_sort(&paging.score_sort));
    println!();

    let notifications = &config.spec.notifications;
    println!("{}", "Notifications:".bold());
    if notifications.enabled {
        println!("  Enabled: {}", "yes".green());
    } else {
        println!("  Enabled: {}", "no".yellow());
    }
    println!("  Event bus capacity: {}", notifications.event_bus_capacity);
    println!("  Mail from: {}", notifications.mail.from);
    println!(
        "  Recipient domain: {}",
        notifications
            .mail
            .recipient_domain
            .as_deref()
            .unwrap_or("(none)")
    );
    for recipient in &notifications.mail.admin_recipients {
        println!("    - {}", recipient);
    }
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = LunchLearnConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    sample_config(with_examples)
        .to_yaml_file(output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

/// The configuration `generate` writes
pub fn sample_config(with_examples: bool) -> LunchLearnConfig {
    let mut config = LunchLearnConfig::default();
    if with_examples {
        let mail = &mut config.spec.notifications.mail;
        mail.admin_recipients = vec!["learning-team@example.com".to_string()];
        mail.recipient_domain = Some("example.com".to_string());
    }
    config
}

fn render_sort(orders: &[SortOrder]) -> String {
    orders
        .iter()
        .map(|order| match order.direction {
            Direction::Asc => format!("{} asc", order.property),
            Direction::Desc => format!("{} desc", order.property),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
