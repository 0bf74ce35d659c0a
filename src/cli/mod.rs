//! Command-line interface.
//!
//! - `serve` starts the HTTP server
//! - `migrate` manages the database schema

pub mod args;

pub use args::{Cli, Commands};
