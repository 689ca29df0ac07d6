//! Debugbar CLI
//!
//! Runs an instrumented demo request through the collectors and prints what
//! the toolbar would receive.
//!
//! # Usage
//!
//! ```bash
//! debugbar --help
//! debugbar demo --pretty
//! debugbar demo --request-start 1700000000.25
//! debugbar widgets
//! ```

#![deny(unsafe_code)]

mod demo;

use clap::{Parser, Subcommand};
use collectors::clock::SystemClock;
use collectors::config::CollectorConfig;
use serde::Serialize;
use std::sync::Arc;

/// Debugbar CLI - inspect what the request collectors produce
#[derive(Parser)]
#[command(name = "debugbar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one request and print the collected data
    Demo {
        /// Request start as seconds since the Unix epoch (defaults to now)
        #[arg(long, env = "DEBUGBAR_REQUEST_START")]
        request_start: Option<f64>,
    },
    /// Print the widget declarations of all collectors
    Widgets,
}

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo { request_start }) => {
            let config = CollectorConfig::from_env()?;
            tracing::debug!(?config, ?request_start, "Running demo request");
            let summary = demo::run(&config, Arc::new(SystemClock), request_start)?;
            print_json(&summary, cli.pretty)?;
        }
        Some(Commands::Widgets) => {
            print_json(&demo::widgets(), cli.pretty)?;
        }
        None => {
            println!("Debugbar CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
