//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Cross-cell buffer management (stats, flush)
//! - [`compute`] - Main command (run the configured computation)
//! - [`config`] - Configuration management (show, path, init)

pub mod cache;
pub mod common;
pub mod compute;
pub mod config;
