//! vplayer CLI - Headless tooling for the vplayer widget
//!
//! Features:
//! - Configuration inspection (merged defaults, quality picks)
//! - Static HTML rendering of the widget skeleton
//! - Scripted interaction replay against an in-memory media host

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

/// vplayer CLI - Video player widget toolkit
#[derive(Parser)]
#[command(name = "vplayer-cli")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Inspect, render and simulate vplayer widget configurations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration and quality selection
    Inspect {
        /// Path to a JSON configuration (defaults when omitted)
        config: Option<PathBuf>,
    },

    /// Render the widget markup as HTML
    Render {
        /// Path to a JSON configuration (defaults when omitted)
        config: Option<PathBuf>,

        /// Write the markup to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay an interaction script against a headless player
    Simulate {
        /// Path to a JSON configuration
        config: PathBuf,

        /// Path to a JSON array of script steps
        script: PathBuf,

        /// Playback length of every source, in seconds
        #[arg(short, long, default_value = "60")]
        duration: f64,

        /// Sources whose load fails
        #[arg(long = "fail-source")]
        fail_sources: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    vplayer_core::init();

    match cli.command {
        Commands::Inspect { config } => {
            commands::inspect(config.as_deref(), &cli.format)?;
        }
        Commands::Render { config, output } => {
            commands::render(config.as_deref(), output.as_deref())?;
        }
        Commands::Simulate {
            config,
            script,
            duration,
            fail_sources,
        } => {
            commands::simulate(&config, &script, duration, &fail_sources, &cli.format)?;
        }
    }

    Ok(())
}
