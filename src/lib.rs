//! Marketplace API.
//!
//! Stores publish product demands; suppliers browse the demands of nearby
//! retailers. The crate is layered:
//!
//! - **cli** / **commands**: command-line entry points
//! - **config**: environment settings and constants
//! - **domain**: entities, enums and geo math
//! - **services**: use cases over the unit of work and external clients
//! - **infra**: database, repositories, HTTP clients and the signed URL cache
//! - **api**: handlers, middleware, extractors and routes
//! - **types**: response envelope and pagination
//! - **errors**: the application error type
//!
//! ```bash
//! cargo run -- migrate up
//! cargo run -- serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserAccess};
pub use errors::{AppError, AppResult};
