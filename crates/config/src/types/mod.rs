//! Configuration type definitions for the Splunk MCP server.
//!
//! Responsibilities:
//! - Define configuration types for authentication, connection and result polling.
//! - Ensure consistent defaults and type safety across the configuration system.
//!
//! Does NOT handle:
//! - Configuration loading from `.env` files or environment variables (see `loader` module).
//! - Actual network connections or authentication flows (see client crate).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - A built [`Config`] is never mutated after it is handed to the client.

mod auth;
mod connection;
mod poll;

pub use auth::{AuthConfig, AuthStrategy};
pub use connection::{Config, ConnectionConfig};
pub use poll::{PollPolicy, TransportFaultPolicy};
