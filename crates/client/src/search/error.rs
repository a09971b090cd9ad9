//! Failure classes of search orchestration.
//!
//! The `Display` text of each variant is exactly the `error` string that ends
//! up in the failure envelope.

use thiserror::Error;

use crate::error::ClientError;
use crate::metrics::SearchOutcomeLabel;

/// Why a search did not produce results.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Job creation failed or returned no job id. Never retried.
    #[error("{message}")]
    Submission { message: String },

    /// Poll budget exhausted without a results body.
    #[error("Search job timeout or no results returned")]
    Timeout { attempts: u32 },

    /// Lower-layer failure that ended the poll loop.
    #[error(transparent)]
    Transport(ClientError),

    /// A 2xx results body that is not JSON at all.
    #[error("Failed to decode search results: {0}")]
    Decode(String),

    /// The caller cancelled before results arrived.
    #[error("Search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Submission failure for a response without a job id.
    pub(crate) fn missing_sid() -> Self {
        Self::Submission {
            message: "Failed to extract job SID".to_string(),
        }
    }

    pub(crate) fn outcome_label(&self) -> SearchOutcomeLabel {
        match self {
            Self::Timeout { .. } => SearchOutcomeLabel::Timeout,
            Self::Cancelled => SearchOutcomeLabel::Cancelled,
            _ => SearchOutcomeLabel::Failure,
        }
    }
}

impl From<ClientError> for SearchError {
    fn from(error: ClientError) -> Self {
        Self::Submission {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_messages() {
        assert_eq!(
            SearchError::missing_sid().to_string(),
            "Failed to extract job SID"
        );
        assert_eq!(
            SearchError::Timeout { attempts: 30 }.to_string(),
            "Search job timeout or no results returned"
        );
        assert_eq!(SearchError::Cancelled.to_string(), "Search cancelled");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            SearchError::Timeout { attempts: 1 }.outcome_label(),
            SearchOutcomeLabel::Timeout
        );
        assert_eq!(
            SearchError::Cancelled.outcome_label(),
            SearchOutcomeLabel::Cancelled
        );
        assert_eq!(
            SearchError::Decode("x".to_string()).outcome_label(),
            SearchOutcomeLabel::Failure
        );
    }

    #[test]
    fn test_client_error_becomes_submission_failure() {
        let err = SearchError::from(ClientError::TransportFault("refused".to_string()));
        assert!(matches!(err, SearchError::Submission { .. }));
        assert!(err.to_string().contains("refused"));
    }
}
