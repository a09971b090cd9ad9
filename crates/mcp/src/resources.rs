//! MCP resources: `splunk://indexes` and `splunk://search/{query}`.

use percent_encoding::percent_decode_str;
use serde_json::{Value, json};
use splunk_client::{CancellationToken, IndexListResult, SearchRequest, SplunkService, Transport};
use thiserror::Error;

const INDEXES_URI: &str = "splunk://indexes";
const SEARCH_URI_PREFIX: &str = "splunk://search/";
const SEARCH_URI_TEMPLATE: &str = "splunk://search/{query}";
const JSON_MIME: &str = "application/json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Search resource needs a query: {0}")]
    EmptyQuery(String),

    #[error("Search query is not valid UTF-8 after decoding: {0}")]
    InvalidEncoding(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Indexes,
    Search { query: String },
}

impl Resource {
    /// Resolve a resource URI. The search query is percent-decoded.
    pub fn parse(uri: &str) -> Result<Self, ResourceError> {
        if uri == INDEXES_URI {
            return Ok(Resource::Indexes);
        }

        let Some(encoded) = uri.strip_prefix(SEARCH_URI_PREFIX) else {
            return Err(ResourceError::UnknownResource(uri.to_string()));
        };
        let query = percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| ResourceError::InvalidEncoding(uri.to_string()))?;
        if query.trim().is_empty() {
            return Err(ResourceError::EmptyQuery(uri.to_string()));
        }

        Ok(Resource::Search {
            query: query.into_owned(),
        })
    }
}

/// `resources/list` payload.
pub fn resource_list() -> Value {
    json!({
        "resources": [{
            "uri": INDEXES_URI,
            "name": "indexes",
            "description": "Get available Splunk indexes as a resource.",
            "mimeType": JSON_MIME
        }]
    })
}

/// `resources/templates/list` payload.
pub fn resource_templates() -> Value {
    json!({
        "resourceTemplates": [{
            "uriTemplate": SEARCH_URI_TEMPLATE,
            "name": "search",
            "description": "Get Splunk search results as a resource (last hour, up to 100 rows).",
            "mimeType": JSON_MIME
        }]
    })
}

/// `resources/read` payload for `uri`.
///
/// Search resources run with the default time bounds and row limit. Splunk
/// failures are rendered as the failure envelope text.
pub async fn read_resource<T: Transport>(
    service: &SplunkService<T>,
    uri: &str,
    cancel: &CancellationToken,
) -> Result<Value, ResourceError> {
    let body = match Resource::parse(uri)? {
        Resource::Indexes => match service.get_indexes().await {
            IndexListResult::Success { indexes } => json!({ "indexes": indexes }),
            failure => serde_json::to_value(&failure).unwrap_or(Value::Null),
        },
        Resource::Search { query } => {
            let outcome = service.search(&SearchRequest::new(query), cancel).await;
            serde_json::to_value(&outcome).unwrap_or(Value::Null)
        }
    };

    let text = serde_json::to_string_pretty(&body).unwrap_or_default();
    Ok(json!({
        "contents": [{ "uri": uri, "mimeType": JSON_MIME, "text": text }]
    }))
}
