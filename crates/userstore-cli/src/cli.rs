//! Command-line arguments.

use clap::{Parser, Subcommand};
use userstore_core::UserId;

/// User store command line.
#[derive(Debug, Parser)]
#[command(name = "userstore", version, about = "Create and read users in a MySQL-backed store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create a user and print it.
    Create {
        /// Display name of the new user.
        name: String,
    },
    /// Print all users.
    List,
    /// Print one user by id.
    Get {
        /// Identifier assigned at creation.
        id: UserId,
    },
}
