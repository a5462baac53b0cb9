//! CLI argument definitions for the `sline` binary.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod status;
pub mod user;

/// Supportline: customer-support AI chat backend.
#[derive(Debug, Parser)]
#[command(name = "sline", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Bind address (overrides config.toml)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config.toml)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Show store totals (users, sessions, messages, feedback)
    Status,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user and issue their API key
    Add {
        /// Display name
        name: String,
        /// Email address (unique)
        #[arg(long)]
        email: String,
    },
}
