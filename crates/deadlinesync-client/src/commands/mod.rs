//! Command implementations.

pub mod canvas;
pub mod config;
pub mod scan;
pub mod sync;
