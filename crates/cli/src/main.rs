// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert: enrich monitoring alerts with query results

mod color;
mod commands;
mod dry_run;
mod exit_error;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::exec::ExecArgs;
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "prepalert",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Enrich monitoring alerts with query results",
    styles = color::styles(),
)]
struct Cli {
    /// Configuration file or directory of .hcl files
    #[arg(long, short, global = true, env = "PREPALERT_CONFIG", default_value = ".")]
    config: PathBuf,

    /// Log filter when PREPALERT_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and compile the configuration
    Validate,
    /// Process one webhook event
    Exec(ExecArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    logging::init(&cli.log_level, cli.log_format)?;
    match cli.command {
        Command::Validate => commands::validate::handle(&cli.config).await,
        Command::Exec(args) => commands::exec::handle(args, &cli.config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(exit_error::exit_code(&e));
    }
}
