//! Index listing endpoint.

use tracing::debug;

use crate::endpoints::request::{decode_json, ensure_success};
use crate::error::Result;
use crate::models::{EntryList, NamedEntry};
use crate::transport::Transport;

const INDEXES_PATH: &str = "/services/data/indexes";

/// List the names of all indexes, in server order.
///
/// `count=0` asks Splunk for every entry instead of the default page of 30.
pub async fn list_index_names<T: Transport>(transport: &T) -> Result<Vec<String>> {
    let query = [
        ("output_mode", "json".to_string()),
        ("count", "0".to_string()),
    ];
    let response = transport.get(INDEXES_PATH, &query).await?;
    let response = ensure_success(response, INDEXES_PATH)?;

    let list: EntryList<NamedEntry> = decode_json(&response, INDEXES_PATH)?;
    debug!(count = list.entry.len(), "Listed indexes");
    Ok(list.entry.into_iter().map(|e| e.name).collect())
}
