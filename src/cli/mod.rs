//! CLI module for outreach - command-line interface and subcommands.
//!
//! Stands in for the presentation layer: it takes a brief, runs the pipeline
//! once and renders the result.

pub mod commands;

pub use commands::Cli;
