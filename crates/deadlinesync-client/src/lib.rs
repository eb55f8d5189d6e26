//! CLI, configuration and sync commands
//!
//! This crate provides the `deadlinesync` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;
pub mod session;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use session::SyncSession;
