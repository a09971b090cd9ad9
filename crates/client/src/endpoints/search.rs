//! Search job endpoints.
//!
//! Responsibilities:
//! - Build the job-creation form and read the job id from its response.
//! - Issue one results request for a job.
//!
//! Does NOT handle:
//! - Polling, sleeping or deciding whether results are complete
//!   (see [`crate::search`]).

use std::num::NonZeroU64;

use tracing::debug;

use crate::endpoints::request::ensure_success;
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::Result;
use crate::models::extract_sid;
use crate::transport::{Transport, TransportResponse};

/// Job-creation endpoint.
pub const JOBS_PATH: &str = "/services/search/jobs";

/// Path of a job's results endpoint.
pub fn results_path(sid: &str) -> String {
    format!("{}/{}/results", JOBS_PATH, encode_path_segment(sid))
}

/// Create a search job.
///
/// The query is sent as `search <query>`; the time bounds are passed through
/// verbatim. Returns `Ok(None)` when Splunk accepted the request but the body
/// carries no job id.
pub async fn create_job<T: Transport>(
    transport: &T,
    query: &str,
    earliest_time: &str,
    latest_time: &str,
) -> Result<Option<String>> {
    let form = [
        ("search", format!("search {query}")),
        ("earliest_time", earliest_time.to_string()),
        ("latest_time", latest_time.to_string()),
        ("output_mode", "json".to_string()),
    ];

    let response = transport.post_form(JOBS_PATH, &form).await?;
    let response = ensure_success(response, JOBS_PATH)?;

    let sid = extract_sid(&response.body);
    debug!(sid = ?sid, "Search job created");
    Ok(sid)
}

/// Request one page of a job's results.
///
/// The raw response is returned whatever its status; the poller decides
/// what a non-success status means.
pub async fn fetch_results<T: Transport>(
    transport: &T,
    sid: &str,
    count: NonZeroU64,
) -> Result<TransportResponse> {
    let query = [
        ("output_mode", "json".to_string()),
        ("count", count.to_string()),
    ];
    transport.get(&results_path(sid), &query).await
}
