//! CLI module - Command-line interface for Roster
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::{cmd_init, cmd_register, cmd_whois};

/// Roster - directory service with database-backed login
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    #[command(alias = "-d", alias = "--daemon", alias = "daemon")]
    Serve,

    /// Write a default config file and create the database
    Init,

    /// Register an account; the password is read from stdin
    #[command(alias = "add")]
    Register {
        /// Display name
        name: String,

        /// Login identifier
        email: String,

        /// Comma-separated authorities, e.g. ROLE_ADMIN,ROLE_USER
        #[arg(long)]
        roles: Option<String>,
    },

    /// Show the principal an email resolves to
    #[command(alias = "info", alias = "i")]
    Whois {
        /// Login identifier
        email: String,
    },
}
