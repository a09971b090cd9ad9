//! Knowledge object reader.
//!
//! Resolves a category name against the fixed type-to-endpoint table, lists
//! the objects with one GET and projects each entry to a
//! [`KnowledgeObjectRecord`].
//!
//! Invariants:
//! - An unknown category answers `Unsupported type: <name>` without any I/O.
//! - Every fault ends up in the failure envelope; nothing is returned as `Err`.

use tracing::{debug, warn};

use crate::endpoints::list_knowledge_objects;
use crate::models::{KnowledgeObjectType, ObjectListResult};
use crate::transport::Transport;

/// List up to `count` objects of the category named `type_name`.
pub async fn fetch_knowledge_objects<T: Transport>(
    transport: &T,
    type_name: &str,
    count: u64,
) -> ObjectListResult {
    let object_type: KnowledgeObjectType = match type_name.parse() {
        Ok(object_type) => object_type,
        Err(e) => {
            debug!(type_name, "Rejected unknown knowledge object type");
            return ObjectListResult::Failure {
                error: e.to_string(),
            };
        }
    };

    match list_knowledge_objects(transport, object_type, count).await {
        Ok(objects) => ObjectListResult::Success {
            object_type,
            objects,
        },
        Err(e) => {
            warn!(object_type = %object_type, error = %e, "Failed to list knowledge objects");
            ObjectListResult::Failure {
                error: e.to_string(),
            }
        }
    }
}
