// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # FieldOps Console CLI
//!
//! The `fieldops` binary drives the scheduling console workflows against a
//! live scheduling API.
//!
//! ## Commands
//!
//! - `fieldops assign` - List nearby agents for a booking and assign one
//! - `fieldops book` - Submit a new appointment
//! - `fieldops config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use fieldops_console::commands::{self, AssignArgs, BookArgs, ConfigCommand};
use fieldops_console::services::ConsoleServices;
use fieldops_core::domain::console_config::ConsoleConfigManifest;

/// FieldOps Console - agent assignment and appointment intake
#[derive(Parser)]
#[command(name = "fieldops")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "FIELDOPS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true, env = "FIELDOPS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search agents for a booking and optionally assign one
    #[command(name = "assign")]
    Assign(AssignArgs),

    /// Submit a new appointment
    #[command(name = "book")]
    Book(BookArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let manifest = ConsoleConfigManifest::load_or_default(cli.config.clone());
    let logging = manifest
        .as_ref()
        .map(|m| m.logging())
        .unwrap_or_default();
    let level = cli.log_level.clone().unwrap_or(logging.level);
    init_logging(&level, &logging.format)?;

    match cli.command {
        Some(Commands::Assign(args)) => {
            let manifest = manifest.context("Failed to load configuration")?;
            let services = ConsoleServices::from_manifest(&manifest)?;
            commands::assign::execute(args, &services).await
        }
        Some(Commands::Book(args)) => {
            let manifest = manifest.context("Failed to load configuration")?;
            let services = ConsoleServices::from_manifest(&manifest)?;
            commands::book::execute(args, &services).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
