//! Knowledge object models.
//!
//! Responsibilities:
//! - Define the closed set of knowledge object categories and the REST path each
//!   one is read from.
//! - Project a raw REST entry onto the five fields callers see.
//!
//! Invariants:
//! - The category table is static; adding a category means adding a variant.
//! - `title` falls back to the entry name; `disabled` falls back to `false`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::serde_helpers::opt_bool_from_flexible;

/// Category of knowledge object that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeObjectType {
    SavedSearches,
    Alerts,
    FieldExtractions,
    FieldAliases,
    CalculatedFields,
    Lookups,
    AutomaticLookups,
    LookupTransforms,
    Macros,
    Tags,
    DataModels,
    WorkflowActions,
    Views,
    Panels,
    Apps,
}

impl KnowledgeObjectType {
    /// Every supported category, in display order.
    pub const ALL: [KnowledgeObjectType; 15] = [
        Self::SavedSearches,
        Self::Alerts,
        Self::FieldExtractions,
        Self::FieldAliases,
        Self::CalculatedFields,
        Self::Lookups,
        Self::AutomaticLookups,
        Self::LookupTransforms,
        Self::Macros,
        Self::Tags,
        Self::DataModels,
        Self::WorkflowActions,
        Self::Views,
        Self::Panels,
        Self::Apps,
    ];

    /// The name callers use for this category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SavedSearches => "saved_searches",
            Self::Alerts => "alerts",
            Self::FieldExtractions => "field_extractions",
            Self::FieldAliases => "field_aliases",
            Self::CalculatedFields => "calculated_fields",
            Self::Lookups => "lookups",
            Self::AutomaticLookups => "automatic_lookups",
            Self::LookupTransforms => "lookup_transforms",
            Self::Macros => "macros",
            Self::Tags => "tags",
            Self::DataModels => "data_models",
            Self::WorkflowActions => "workflow_actions",
            Self::Views => "views",
            Self::Panels => "panels",
            Self::Apps => "apps",
        }
    }

    /// REST path, relative to the management base URL.
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::SavedSearches | Self::Alerts => "/services/saved/searches",
            Self::FieldExtractions => "/services/data/props/extractions",
            Self::FieldAliases => "/services/data/props/fieldaliases",
            Self::CalculatedFields => "/services/data/props/fieldtransformations",
            Self::Lookups => "/services/data/lookup-table-files",
            Self::AutomaticLookups => "/services/data/transforms/automatic_lookups",
            Self::LookupTransforms => "/services/data/transforms/lookups",
            Self::Macros => "/services/data/macros",
            Self::Tags => "/services/data/tags",
            Self::DataModels => "/services/datamodel/model",
            Self::WorkflowActions => "/services/data/ui/workflow-actions",
            Self::Views => "/services/data/ui/views",
            Self::Panels => "/services/data/ui/panels",
            Self::Apps => "/services/apps/local",
        }
    }

    /// Extra query parameter narrowing the listing, if the category needs one.
    ///
    /// Alerts are the saved searches that carry an `alert_type`.
    pub const fn filter(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Alerts => Some(("search", "alert_type=*")),
            _ => None,
        }
    }
}

impl fmt::Display for KnowledgeObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported type: {0}")]
pub struct UnsupportedType(pub String);

impl FromStr for KnowledgeObjectType {
    type Err = UnsupportedType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnsupportedType(s.to_string()))
    }
}

/// Raw listing entry as returned by the REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeEntry {
    pub name: String,
    #[serde(default)]
    pub content: KnowledgeContent,
    #[serde(default)]
    pub acl: KnowledgeAcl,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KnowledgeContent {
    pub label: Option<String>,
    #[serde(default, deserialize_with = "opt_bool_from_flexible")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KnowledgeAcl {
    pub app: Option<String>,
    pub owner: Option<String>,
}

/// Projection of one knowledge object.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct KnowledgeObjectRecord {
    pub name: String,
    pub title: String,
    pub disabled: bool,
    pub app: Option<String>,
    pub owner: Option<String>,
}

impl From<KnowledgeEntry> for KnowledgeObjectRecord {
    fn from(entry: KnowledgeEntry) -> Self {
        let title = entry
            .content
            .label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| entry.name.clone());
        Self {
            name: entry.name,
            title,
            disabled: entry.content.disabled.unwrap_or(false),
            app: entry.acl.app,
            owner: entry.acl.owner,
        }
    }
}
