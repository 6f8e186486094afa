//! CLI module for incidentd
//!
//! Provides command-line interface for:
//! - init: Create the database file and schema
//! - serve: Start the HTTP server

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, Config};
pub use errors::{CliError, CliResult};
