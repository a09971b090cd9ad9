//! Knowledge object listing endpoint.

use tracing::debug;

use crate::endpoints::request::{decode_json, ensure_success};
use crate::error::Result;
use crate::models::{EntryList, KnowledgeEntry, KnowledgeObjectRecord, KnowledgeObjectType};
use crate::transport::Transport;

/// List up to `count` objects of one category and project them.
pub async fn list_knowledge_objects<T: Transport>(
    transport: &T,
    object_type: KnowledgeObjectType,
    count: u64,
) -> Result<Vec<KnowledgeObjectRecord>> {
    let path = object_type.endpoint();
    let mut query = vec![
        ("output_mode", "json".to_string()),
        ("count", count.to_string()),
    ];
    if let Some((key, value)) = object_type.filter() {
        query.push((key, value.to_string()));
    }

    let response = transport.get(path, &query).await?;
    let response = ensure_success(response, path)?;

    let list: EntryList<KnowledgeEntry> = decode_json(&response, path)?;
    debug!(
        object_type = %object_type,
        count = list.entry.len(),
        "Listed knowledge objects"
    );
    Ok(list
        .entry
        .into_iter()
        .map(KnowledgeObjectRecord::from)
        .collect())
}
