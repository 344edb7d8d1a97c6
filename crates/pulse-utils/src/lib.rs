//! Shared utilities for stock-pulse
//!
//! This crate provides the logging setup and process-level configuration
//! shared by the binaries in the workspace.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
