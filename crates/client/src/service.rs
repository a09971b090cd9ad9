//! The tool operations, each answering with a success/failure envelope.
//!
//! Responsibilities:
//! - Expose one method per tool: search, index listing, log statistics,
//!   error search, knowledge objects, user listing and user lookup.
//! - Convert every fault into the failure envelope with enough context
//!   (query, index, username) to correlate it.
//!
//! Does NOT handle:
//! - Argument parsing and defaults of the tool protocol (see the server binary).
//!
//! Invariants:
//! - No method returns `Err` or panics because of a Splunk-side problem.

use std::num::NonZeroU64;
use std::sync::Arc;

use splunk_config::{Config, PollPolicy};
use tracing::warn;

use crate::cancellation::CancellationToken;
use crate::client::SplunkClient;
use crate::endpoints::{get_user_entry, list_index_names, list_usernames};
use crate::error::Result;
use crate::knowledge::fetch_knowledge_objects;
use crate::metrics::MetricsCollector;
use crate::models::{IndexListResult, ObjectListResult, UserInfoResult, UserListResult};
use crate::search::{IndexedOutcome, SearchOrchestrator, SearchOutcome, SearchRequest};
use crate::transport::Transport;

/// Every Splunk tool behind one shared transport.
#[derive(Debug)]
pub struct SplunkService<T> {
    orchestrator: SearchOrchestrator<T>,
}

impl<T> Clone for SplunkService<T> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl SplunkService<SplunkClient> {
    /// Build the production service: an HTTP client and a poller configured
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config, metrics: MetricsCollector) -> Result<Self> {
        let client = SplunkClient::builder()
            .from_config(config)
            .metrics(metrics)
            .build()?;
        Ok(Self::new(Arc::new(client), config.poll).with_metrics(metrics))
    }
}

impl<T: Transport> SplunkService<T> {
    pub fn new(transport: Arc<T>, policy: PollPolicy) -> Self {
        Self {
            orchestrator: SearchOrchestrator::new(transport, policy),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.orchestrator = self.orchestrator.with_metrics(metrics);
        self
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator<T> {
        &self.orchestrator
    }

    fn transport(&self) -> &T {
        self.orchestrator.transport().as_ref()
    }

    /// Run an ad-hoc search.
    pub async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        self.orchestrator.run_with_cancel(request, cancel).await
    }

    /// Names of all indexes, in server order.
    pub async fn get_indexes(&self) -> IndexListResult {
        match list_index_names(self.transport()).await {
            Ok(indexes) => IndexListResult::Success { indexes },
            Err(e) => {
                warn!(error = %e, "Failed to list indexes");
                IndexListResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Event counts by sourcetype for `index`.
    pub async fn get_log_stats(
        &self,
        index: &str,
        time_range: &str,
        cancel: &CancellationToken,
    ) -> IndexedOutcome {
        self.orchestrator
            .get_log_stats(index, time_range, cancel)
            .await
    }

    /// Error-looking events in `index`.
    pub async fn search_errors(
        &self,
        index: &str,
        time_range: &str,
        max_count: NonZeroU64,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        self.orchestrator
            .search_errors(index, time_range, max_count, cancel)
            .await
    }

    /// Knowledge objects of the category named `type_name`.
    pub async fn get_knowledge_objects(&self, type_name: &str, count: u64) -> ObjectListResult {
        fetch_knowledge_objects(self.transport(), type_name, count).await
    }

    /// All usernames.
    pub async fn get_all_users(&self) -> UserListResult {
        match list_usernames(self.transport()).await {
            Ok(usernames) => UserListResult::Success { usernames },
            Err(e) => {
                warn!(error = %e, "Failed to list users");
                UserListResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Raw account entry for `username`.
    pub async fn get_user_info(&self, username: &str) -> UserInfoResult {
        match get_user_entry(self.transport(), username).await {
            Ok(user) => UserInfoResult::Success {
                username: username.to_string(),
                user,
            },
            Err(e) => {
                warn!(username, error = %e, "Failed to fetch user");
                UserInfoResult::Failure {
                    username: username.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}
