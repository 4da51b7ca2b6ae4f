// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Training status commands
//!
//! Commands: check, table

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use lunchlearn_core::domain::training::{is_valid_transition, TrainingStatus};

#[derive(Subcommand)]
pub enum StatusCommand {
    /// Check whether a training may move from one status to another
    Check {
        /// Current status (NOMINATED, SCHEDULED, COMPLETED, CANCELLED, POSTPONED)
        #[arg(value_name = "FROM")]
        from: String,

        /// Requested status
        #[arg(value_name = "TO")]
        to: String,
    },

    /// Print the full transition table
    Table,
}

pub fn handle_command(command: StatusCommand) -> Result<()> {
    match command {
        StatusCommand::Check { from, to } => check(&from, &to),
        StatusCommand::Table => {
            print!("{}", transition_table());
            Ok(())
        }
    }
}

fn check(from: &str, to: &str) -> Result<()> {
    let (from, to) = parse_pair(from, to)?;

    if is_valid_transition(from, to) {
        println!("{}", format!("✓ {} -> {} is allowed", from, to).green());
    } else {
        println!("{}", format!("✗ {} -> {} is not allowed", from, to).red());
        std::process::exit(2);
    }

    Ok(())
}

pub fn parse_pair(from: &str, to: &str) -> Result<(TrainingStatus, TrainingStatus)> {
    let from = from
        .parse::<TrainingStatus>()
        .with_context(|| format!("Invalid FROM status '{}'", from))?;
    let to = to
        .parse::<TrainingStatus>()
        .with_context(|| format!("Invalid TO status '{}'", to))?;
    Ok((from, to))
}

/// Rows are sources, columns targets
pub fn transition_table() -> String {
    let mut table = format!("{:<12}", "FROM \\ TO");
    for to in TrainingStatus::ALL {
        table.push_str(&format!("{:<12}", to.as_str()));
    }
    table.push('\n');

    for from in TrainingStatus::ALL {
        table.push_str(&format!("{:<12}", from.as_str()));
        for to in TrainingStatus::ALL {
            let cell = if is_valid_transition(from, to) { "yes" } else { "-" };
            table.push_str(&format!("{:<12}", cell));
        }
        table.push('\n');
    }
    table
}
