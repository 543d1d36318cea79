//! Fetch requests and their outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a UI region whose content, loading and error state a fetch
/// controls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One logical data need: where to get it, where to cache it, and which
/// regions render it.
///
/// Fields are private so a request cannot change after it is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: String,
    cache_key: String,
    target_ids: BTreeSet<TargetId>,
}

impl FetchRequest {
    pub fn new<I, T>(url: impl Into<String>, cache_key: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetId>,
    {
        Self {
            url: url.into(),
            cache_key: cache_key.into(),
            target_ids: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn target_ids(&self) -> &BTreeSet<TargetId> {
        &self.target_ids
    }
}

/// Tagged result of a fetch. Network, status and parse failures are not
/// distinguished here; only the human-readable reason survives.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Value),
    Failure(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failure(_))
    }

    /// Borrow the payload of a successful outcome.
    pub fn data(&self) -> Option<&Value> {
        match self {
            FetchOutcome::Success(data) => Some(data),
            FetchOutcome::Failure(_) => None,
        }
    }

    /// Borrow the reason of a failed outcome.
    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Failure(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_dedups_targets() {
        let request = FetchRequest::new("u", "k", ["a", "b", "a"]);
        assert_eq!(request.target_ids().len(), 2);
        assert!(request.target_ids().contains(&TargetId::new("a")));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = FetchOutcome::Success(json!([1, 2]));
        let failed = FetchOutcome::Failure("API limit reached".into());
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&json!([1, 2])));
        assert!(failed.is_failure());
        assert_eq!(failed.reason(), Some("API limit reached"));
        assert!(failed.data().is_none());
    }
}
