//! # Userstore Config
//!
//! Environment-sourced configuration for the user store: the MySQL target
//! and the optional distributed-tracing settings.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
