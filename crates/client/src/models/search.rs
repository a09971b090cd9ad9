//! Search job wire models.
//!
//! Responsibilities:
//! - Read the job id out of a job-creation response.
//! - Decode a results page and tell "results available" apart from "not yet".
//!
//! Invariants:
//! - Presence of a top-level `results` array is the completion signal; an empty
//!   array is a complete (successful) result set.
//! - Any other valid JSON (an object without `results`, an array, a string,
//!   `null`) means the job is not ready yet.
//! - Rows are passed through as-is, so non-object rows survive.

use serde::Deserialize;

/// One result row, usually an object of field name to value.
pub type SearchRecord = serde_json::Value;

#[derive(Debug, Deserialize)]
struct JobCreated {
    sid: Option<String>,
    #[serde(default)]
    entry: Vec<JobCreatedEntry>,
}

#[derive(Debug, Deserialize)]
struct JobCreatedEntry {
    content: Option<JobCreatedContent>,
}

#[derive(Debug, Deserialize)]
struct JobCreatedContent {
    sid: Option<String>,
}

/// Extract the job id from a job-creation response body.
///
/// Accepts the top-level `sid` field and the `entry[0].content.sid` shape.
/// Returns `None` when the body is not JSON or carries no usable id.
pub fn extract_sid(body: &str) -> Option<String> {
    let created: JobCreated = serde_json::from_str(body).ok()?;
    created
        .sid
        .or_else(|| {
            created
                .entry
                .into_iter()
                .next()
                .and_then(|e| e.content)
                .and_then(|c| c.sid)
        })
        .filter(|sid| !sid.trim().is_empty())
}

/// Decode a 2xx results body.
///
/// - `Ok(Some(rows))`: results are available (possibly empty).
/// - `Ok(None)`: the job has not produced results yet (empty body, or valid
///   JSON without a top-level `results` array).
/// - `Err(_)`: the body is not JSON.
pub fn parse_results_page(body: &str) -> Result<Option<Vec<SearchRecord>>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let mut page: serde_json::Value = serde_json::from_str(body)?;
    match page.get_mut("results").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(rows)) => Ok(Some(rows)),
        _ => Ok(None),
    }
}
