//! CLI module for the user registry
//!
//! - `serve`: run the HTTP API
//! - `check`: validate a snapshot file without starting a server

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// User Registry - in-memory user store with JSON snapshots
#[derive(Parser)]
#[command(name = "user-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Load a snapshot file into an empty store and report the result
    Check(check::CheckArgs),
}
