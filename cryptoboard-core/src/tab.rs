//! Tab identifiers and per-tab load status.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Load status of a tab within one page session.
///
/// `NotLoaded -> Loading -> Loaded`, or `Loading -> Failed`; a failed tab
/// goes back to `Loading` the next time it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

impl TabStatus {
    /// Whether activating a tab in this status should issue its fetch.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, TabStatus::NotLoaded | TabStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_fetch() {
        assert!(TabStatus::NotLoaded.needs_fetch());
        assert!(TabStatus::Failed.needs_fetch());
        assert!(!TabStatus::Loading.needs_fetch());
        assert!(!TabStatus::Loaded.needs_fetch());
    }
}
