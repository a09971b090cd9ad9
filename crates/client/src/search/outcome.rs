//! The uniform search envelope.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::SearchRecord;

/// Result of one search orchestration. Both variants carry the query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success {
        results: Vec<SearchRecord>,
        query: String,
    },
    Failure {
        error: String,
        query: String,
    },
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Success { query, .. } | Self::Failure { query, .. } => query,
        }
    }

    /// Rows on success.
    pub fn results(&self) -> Option<&[SearchRecord]> {
        match self {
            Self::Success { results, .. } => Some(results),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Number of rows; zero on failure.
    pub fn count(&self) -> usize {
        self.results().map_or(0, <[SearchRecord]>::len)
    }
}

impl Serialize for SearchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { results, query } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("results", results)?;
                map.serialize_entry("query", query)?;
                map.serialize_entry("count", &results.len())?;
                map.end()
            }
            Self::Failure { error, query } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("query", query)?;
                map.end()
            }
        }
    }
}

/// Outcome of a per-index search; failures also name the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedOutcome {
    pub index: String,
    pub outcome: SearchOutcome,
}

impl Serialize for IndexedOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.outcome {
            SearchOutcome::Success { .. } => self.outcome.serialize(serializer),
            SearchOutcome::Failure { error, query } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("query", query)?;
                map.serialize_entry("index", &self.index)?;
                map.end()
            }
        }
    }
}
