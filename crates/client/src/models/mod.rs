//! Data models for Splunk API responses and tool answers.
//!
//! Wire types are organized by resource in submodules; the tool envelopes
//! live in `results`. Everything is re-exported here for convenient access.

pub mod common;
pub mod knowledge;
pub mod results;
pub mod search;

pub use common::{EntryList, MessageType, NamedEntry, SplunkMessage, SplunkMessages};
pub use knowledge::{
    KnowledgeAcl, KnowledgeContent, KnowledgeEntry, KnowledgeObjectRecord, KnowledgeObjectType,
    UnsupportedType,
};
pub use results::{IndexListResult, ObjectListResult, UserInfoResult, UserListResult};
pub use search::{SearchRecord, extract_sid, parse_results_page};
