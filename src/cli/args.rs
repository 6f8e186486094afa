//! CLI argument definitions using clap
//!
//! Commands:
//! - incidentd init --config <path>
//! - incidentd serve --config <path> [--memory]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// incidentd - A minimal incident-tracking CRUD service
#[derive(Parser, Debug)]
#[command(name = "incidentd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the incident database (config file too, if absent)
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./incidentd.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./incidentd.json")]
        config: PathBuf,

        /// Use a volatile in-memory table instead of the database file
        #[arg(long)]
        memory: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
