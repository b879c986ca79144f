pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notewatch")]
#[command(about = "Watch release-notes pages and report new versions", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/notewatch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of sources checked in parallel (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check sources once and send notifications for changes
    Check {
        /// Only check these source ids (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },
    /// List configured sources and their stored fingerprints
    Sources,
    /// Forget the stored fingerprint of a source
    Reset {
        /// Source id
        id: String,
    },
    /// Check all sources repeatedly until interrupted
    Watch {
        /// Check interval (e.g., "30m", "1h", "1d")
        #[arg(short, long, default_value = "1h")]
        interval: String,

        /// Skip the check on start
        #[arg(long)]
        no_initial_check: bool,
    },
}
