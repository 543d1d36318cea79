//! Error types for pipeline operations

use thiserror::Error;

/// Reasons a single fetch can fail.
///
/// The distinction only exists for diagnostics: at the fetcher boundary all
/// variants collapse into [`crate::FetchOutcome::Failure`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("{}", status_reason(*.status))]
    Status { status: u16 },

    #[error("malformed response body: {reason}")]
    Parse { reason: String },
}

impl FetchError {
    /// Short, stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Status { .. } => "status",
            FetchError::Parse { .. } => "parse",
        }
    }
}

fn status_reason(status: u16) -> String {
    if status == 429 {
        "API limit reached".to_string()
    } else {
        format!("unexpected HTTP status {}", status)
    }
}

/// Key/value storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Remove failed for key {key}: {reason}")]
    RemoveFailed { key: String, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_status_reads_api_limit_reached() {
        let err = FetchError::Status { status: 429 };
        assert_eq!(err.to_string(), "API limit reached");
    }

    #[test]
    fn test_other_status_mentions_code() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "unexpected HTTP status 503");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_kind_labels() {
        let network = FetchError::Network {
            url: "http://x".into(),
            reason: "refused".into(),
        };
        let parse = FetchError::Parse {
            reason: "eof".into(),
        };
        assert_eq!(network.kind(), "network");
        assert_eq!(parse.kind(), "parse");
    }
}
