//! Configuration management for the Splunk MCP server.
//!
//! This crate provides the immutable configuration value handed to the
//! Splunk transport at construction time, and the loader that assembles it
//! from `.env` files, environment variables and explicit overrides.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{
    AuthConfig, AuthStrategy, Config, ConnectionConfig, PollPolicy, TransportFaultPolicy,
};
