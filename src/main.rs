//! Outliner MCP Server - Main Entry Point
//!
//! This is the main entry point for the outliner MCP server application.
//! The actual implementation is in the `outliner_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use outliner_mcp::{Config, OutlinerServerHandler};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Outliner MCP Server - prioritized task outline and timetable via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the data file
    file: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout carries the MCP protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::load(args.config.as_deref())?;
    let handler = OutlinerServerHandler::new(&args.file, config)?;
    info!(file = %args.file.display(), "serving outliner over stdio");
    serve_stdio(handler).await?;
    Ok(())
}
