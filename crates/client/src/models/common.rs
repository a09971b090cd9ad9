//! Common types shared across Splunk API models.
//!
//! This module contains generic wrappers and shared types used by multiple
//! resource modules. It does NOT contain resource-specific models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of message from Splunk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MessageType {
    #[serde(rename = "FATAL")]
    Fatal,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "INFO")]
    Info,
    /// Unknown or unrecognized message type.
    #[serde(other)]
    #[default]
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal => write!(f, "FATAL"),
            Self::Error => write!(f, "ERROR"),
            Self::Warn => write!(f, "WARN"),
            Self::Info => write!(f, "INFO"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Collection envelope returned by Splunk's REST listing endpoints.
///
/// A response without an `entry` field decodes to an empty list.
#[derive(Debug, Deserialize, Clone)]
pub struct EntryList<T> {
    #[serde(default = "Vec::new")]
    pub entry: Vec<T>,
}

/// An entry reduced to its name.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
}

/// A single message from Splunk (usually in error responses).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SplunkMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub text: String,
}

/// A collection of messages from Splunk.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SplunkMessages {
    pub messages: Vec<SplunkMessage>,
}

impl SplunkMessages {
    /// `TYPE: text` pairs joined with `; `.
    pub fn summary(&self) -> String {
        self.messages
            .iter()
            .map(|msg| format!("{}: {}", msg.message_type, msg.text))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_deserialization() {
        assert_eq!(
            serde_json::from_str::<MessageType>("\"ERROR\"").unwrap(),
            MessageType::Error
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"WARN\"").unwrap(),
            MessageType::Warn
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"FATAL\"").unwrap(),
            MessageType::Fatal
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"invalid\"").unwrap(),
            MessageType::Unknown
        );
    }

    #[test]
    fn test_messages_summary() {
        let json = r#"{
            "messages": [
                {"type": "ERROR", "text": "Invalid username or password"},
                {"type": "WARN", "text": "Second"}
            ]
        }"#;
        let msgs: SplunkMessages = serde_json::from_str(json).unwrap();
        assert_eq!(
            msgs.summary(),
            "ERROR: Invalid username or password; WARN: Second"
        );
    }

    #[test]
    fn test_entry_list_missing_entry_is_empty() {
        let list: EntryList<NamedEntry> = serde_json::from_str(r#"{"paging": {}}"#).unwrap();
        assert!(list.entry.is_empty());
    }
}
