// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;
mod error;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use admissions_api::RequestContext;
use admissions_audit::{Actor, Cause};
use admissions_domain::TenantId;
use admissions_persistence::{Persistence, PersistenceConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::error::CliError;

/// Admissions - operator command line for the school admissions lifecycle
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Tenant the command acts for
    #[arg(short, long, default_value_t = 1)]
    tenant: i64,

    /// Actor recorded on audit events
    #[arg(short, long, default_value = "operator")]
    actor: String,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// How long a file-backed store waits on a locked database
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u32,

    #[command(subcommand)]
    command: Command,
}

fn open_store(args: &Args) -> Result<Persistence, CliError> {
    let persistence: Persistence = if let Some(path) = &args.database {
        info!("Using file-based database at: {}", path.display());
        let config = PersistenceConfig {
            busy_timeout_ms: args.busy_timeout_ms,
            ..PersistenceConfig::default()
        };
        Persistence::new_with_file(path, config)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut persistence: Persistence = open_store(&args)?;
    let ctx = RequestContext::with_system_clock(
        TenantId::new(args.tenant),
        Actor::new(args.actor.clone(), String::from("operator")),
        Cause::new(String::from("cli"), args.command.describe().to_string()),
    );

    let output: String = commands::run(&mut persistence, &ctx, args.command)?;
    println!("{output}");
    Ok(())
}
