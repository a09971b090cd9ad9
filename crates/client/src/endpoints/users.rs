//! User endpoints.

use tracing::debug;

use crate::endpoints::request::{decode_json, ensure_success};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::Result;
use crate::models::{EntryList, NamedEntry};
use crate::transport::Transport;

const USERS_PATH: &str = "/services/authentication/users";

/// List every username.
pub async fn list_usernames<T: Transport>(transport: &T) -> Result<Vec<String>> {
    let query = [
        ("output_mode", "json".to_string()),
        ("count", "0".to_string()),
    ];
    let response = transport.get(USERS_PATH, &query).await?;
    let response = ensure_success(response, USERS_PATH)?;

    let list: EntryList<NamedEntry> = decode_json(&response, USERS_PATH)?;
    debug!(count = list.entry.len(), "Listed users");
    Ok(list.entry.into_iter().map(|e| e.name).collect())
}

/// Fetch the raw entry for one user.
///
/// Returns an empty object when the response contains no entry.
pub async fn get_user_entry<T: Transport>(
    transport: &T,
    username: &str,
) -> Result<serde_json::Value> {
    let path = format!("{}/{}", USERS_PATH, encode_path_segment(username));
    let query = [("output_mode", "json".to_string())];

    let response = transport.get(&path, &query).await?;
    let response = ensure_success(response, &path)?;

    let list: EntryList<serde_json::Value> = decode_json(&response, &path)?;
    Ok(list
        .entry
        .into_iter()
        .next()
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())))
}
