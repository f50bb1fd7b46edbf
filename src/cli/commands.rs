//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - send: run the pipeline for one recipient brief
//! - agents: show the agent roster
//! - check: show configuration and API key status

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Outreach - multi-agent cold sales email generation and delivery
#[derive(Parser, Debug)]
#[command(name = "outreach")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draft, select, format and send one cold email
    Send {
        /// Who the email is for, e.g. "Dear CEO of a fintech startup preparing for SOC 2"
        brief: String,

        /// Log the email instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Print the full result (including the call trace) as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the agents and tools of the pipeline
    Agents,

    /// Show configuration and credential status
    Check,
}
