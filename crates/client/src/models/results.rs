//! Success/failure envelopes for the non-search tools.
//!
//! Every tool answers with a JSON object whose `success` flag tells which
//! shape follows. Failures always carry an `error` string plus whatever input
//! the caller needs to correlate the answer (e.g. `username`).

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::knowledge::{KnowledgeObjectRecord, KnowledgeObjectType};

/// Answer of the knowledge object reader.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectListResult {
    Success {
        object_type: KnowledgeObjectType,
        objects: Vec<KnowledgeObjectRecord>,
    },
    Failure {
        error: String,
    },
}

impl ObjectListResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Serialize for ObjectListResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success {
                object_type,
                objects,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("type", object_type.as_str())?;
                map.serialize_entry("count", &objects.len())?;
                map.serialize_entry("objects", objects)?;
                map.end()
            }
            Self::Failure { error } => failure(serializer, error, None),
        }
    }
}

/// Answer of the index listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexListResult {
    Success { indexes: Vec<String> },
    Failure { error: String },
}

impl IndexListResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Index names, empty on failure.
    pub fn names(&self) -> &[String] {
        match self {
            Self::Success { indexes } => indexes,
            Self::Failure { .. } => &[],
        }
    }
}

impl Serialize for IndexListResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { indexes } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("indexes", indexes)?;
                map.serialize_entry("count", &indexes.len())?;
                map.end()
            }
            Self::Failure { error } => failure(serializer, error, None),
        }
    }
}

/// Answer of the user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserListResult {
    Success { usernames: Vec<String> },
    Failure { error: String },
}

impl UserListResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Serialize for UserListResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { usernames } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("usernames", usernames)?;
                map.serialize_entry("count", &usernames.len())?;
                map.end()
            }
            Self::Failure { error } => failure(serializer, error, None),
        }
    }
}

/// Answer of the single-user lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum UserInfoResult {
    Success {
        username: String,
        /// First entry returned by the server, or an empty object.
        user: serde_json::Value,
    },
    Failure {
        username: String,
        error: String,
    },
}

impl UserInfoResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Serialize for UserInfoResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { username, user } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("username", username)?;
                map.serialize_entry("user", user)?;
                map.end()
            }
            Self::Failure { username, error } => {
                failure(serializer, error, Some(("username", username)))
            }
        }
    }
}

/// `{"success": false, "error": ..., <context>}`.
pub(crate) fn failure<S: Serializer>(
    serializer: S,
    error: &str,
    context: Option<(&str, &str)>,
) -> Result<S::Ok, S::Error> {
    let len = if context.is_some() { 3 } else { 2 };
    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("success", &false)?;
    map.serialize_entry("error", error)?;
    if let Some((key, value)) = context {
        map.serialize_entry(key, value)?;
    }
    map.end()
}
