//! Centralized constants for the Splunk MCP workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

use std::num::NonZeroU64;

const fn row_limit(n: u64) -> NonZeroU64 {
    match NonZeroU64::new(n) {
        Some(n) => n,
        None => panic!("row limit must be positive"),
    }
}

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default session time-to-live in seconds (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Default buffer time before session expiry to proactively refresh tokens.
pub const DEFAULT_EXPIRY_BUFFER_SECS: u64 = 60;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Maximum allowed session TTL in seconds (24 hours).
pub const MAX_SESSION_TTL_SECS: u64 = 86400;

/// Default Splunk management port.
pub const DEFAULT_SPLUNK_PORT: u16 = 8089;

/// Default URL scheme used when the base URL is assembled from host and port.
pub const DEFAULT_SPLUNK_SCHEME: &str = "https";

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Search Job Polling
// =============================================================================

/// Default number of result polls before a search is declared timed out.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;

/// Upper bound for the configurable poll budget.
pub const MAX_POLL_MAX_ATTEMPTS: u32 = 600;

/// Default spacing between result polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Upper bound for the configurable poll spacing in milliseconds.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

// =============================================================================
// Tool Defaults
// =============================================================================

/// Default earliest time for ad-hoc searches.
pub const DEFAULT_EARLIEST_TIME: &str = "-1h";

/// Default latest time for ad-hoc searches.
pub const DEFAULT_LATEST_TIME: &str = "now";

/// Default maximum number of results returned by an ad-hoc search.
///
/// Row limits are never zero: Splunk reads `count=0` as "no limit".
pub const DEFAULT_MAX_COUNT: NonZeroU64 = row_limit(100);

/// Default index pattern for the cross-index error search.
pub const DEFAULT_ERROR_SEARCH_INDEX: &str = "*";

/// Default maximum number of results returned by the error search.
pub const DEFAULT_ERROR_SEARCH_MAX_COUNT: NonZeroU64 = row_limit(50);

/// Default number of knowledge objects fetched per request.
pub const DEFAULT_KNOWLEDGE_OBJECT_COUNT: u64 = 100;
