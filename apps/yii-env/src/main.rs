//! Yii environment CLI.
//!
//! The `yii-env` command resolves the layered configuration in a config
//! directory and prints the result, for checking a deployment by hand.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "yii-env")]
#[command(about = "Inspect the resolved Yii environment for a config directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the full environment and print it
    ///
    /// This is a real resolution: with a console config present it records
    /// the mode marker if none exists yet. Pass --no-marker to avoid that.
    Show {
        #[command(flatten)]
        resolve: commands::ResolveArgs,

        /// Output as raw JSON (no formatting)
        #[arg(long)]
        json: bool,

        /// Keep the mode marker in memory instead of writing it
        #[arg(long, conflicts_with = "from_marker")]
        no_marker: bool,
    },

    /// Print the active mode without loading any config
    Mode {
        #[command(flatten)]
        resolve: commands::ResolveArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match cli.command {
        Commands::Show {
            resolve,
            json,
            no_marker,
        } => commands::show::execute(&resolve, json, no_marker),
        Commands::Mode { resolve } => commands::mode::execute(&resolve),
    }
}
