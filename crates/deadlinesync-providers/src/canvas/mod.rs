//! Canvas LMS source.
//!
//! [`CanvasSource`] reads courses, assignments, calendar events, syllabus
//! bodies and course files from the Canvas REST API using a personal access
//! token.
//!
//! # Example
//!
//! ```ignore
//! use deadlinesync_providers::canvas::{CanvasConfig, CanvasSource};
//!
//! let config = CanvasConfig::new("https://school.instructure.com", token)?;
//! let source = CanvasSource::new(config)?;
//! let courses = source.list_courses().await?;
//! ```

mod api;
mod client;
mod config;
mod provider;

pub use client::CanvasClient;
pub use config::CanvasConfig;
pub use provider::CanvasSource;
