//! # Userstore CLI
//!
//! Composition root for the user store: parses the command line, wires the
//! connection manager into a repository, and runs one operation.

pub mod app;
pub mod cli;
pub mod startup;

pub use app::*;
pub use cli::*;
