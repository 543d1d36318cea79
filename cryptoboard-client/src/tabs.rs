//! Lazily loaded tabs.

use std::collections::HashMap;

use cryptoboard_core::{FetchRequest, TabId, TabStatus};

/// Tracks which tab is visible and the load status of each.
///
/// Owned by a single page session and discarded with it. A tab's request is
/// issued the first time it is activated and again after a failure; a loaded
/// tab is never refetched within the session.
#[derive(Debug, Clone)]
pub struct TabController {
    order: Vec<TabId>,
    requests: HashMap<TabId, FetchRequest>,
    statuses: HashMap<TabId, TabStatus>,
    active: Option<TabId>,
}

impl TabController {
    pub fn new<I>(tabs: I) -> Self
    where
        I: IntoIterator<Item = (TabId, FetchRequest)>,
    {
        let mut order = Vec::new();
        let mut requests = HashMap::new();
        for (tab, request) in tabs {
            if requests.insert(tab.clone(), request).is_none() {
                order.push(tab);
            }
        }
        let statuses = order
            .iter()
            .map(|tab| (tab.clone(), TabStatus::NotLoaded))
            .collect();
        Self {
            order,
            requests,
            statuses,
            active: None,
        }
    }

    /// Make `tab` the visible tab.
    ///
    /// Returns the request to issue when the tab has never loaded or last
    /// failed; the tab is then `Loading`. Unknown tabs are ignored.
    pub fn activate(&mut self, tab: &TabId) -> Option<FetchRequest> {
        let Some(status) = self.statuses.get_mut(tab) else {
            tracing::warn!(tab = %tab, "activation of unknown tab ignored");
            return None;
        };
        self.active = Some(tab.clone());

        if !status.needs_fetch() {
            return None;
        }
        *status = TabStatus::Loading;
        tracing::debug!(tab = %tab, "tab loading");
        self.requests.get(tab).cloned()
    }

    /// Record the outcome of a tab's fetch. Only a `Loading` tab changes.
    pub fn resolve(&mut self, tab: &TabId, success: bool) {
        if let Some(status) = self.statuses.get_mut(tab) {
            if *status == TabStatus::Loading {
                *status = if success {
                    TabStatus::Loaded
                } else {
                    TabStatus::Failed
                };
            }
        }
    }

    pub fn status(&self, tab: &TabId) -> Option<TabStatus> {
        self.statuses.get(tab).copied()
    }

    pub fn active(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    pub fn is_visible(&self, tab: &TabId) -> bool {
        self.active.as_ref() == Some(tab)
    }

    pub fn tabs(&self) -> &[TabId] {
        &self.order
    }

    pub fn request(&self, tab: &TabId) -> Option<&FetchRequest> {
        self.requests.get(tab)
    }

    /// The tab whose request has `cache_key`, if any.
    pub fn tab_for_cache_key(&self, cache_key: &str) -> Option<&TabId> {
        self.order
            .iter()
            .find(|tab| self.requests.get(*tab).is_some_and(|r| r.cache_key() == cache_key))
    }

    pub fn index_of(&self, tab: &TabId) -> Option<usize> {
        self.order.iter().position(|t| t == tab)
    }

    /// Tab `offset` positions away from the active one, wrapping around.
    pub fn neighbour(&self, offset: isize) -> Option<TabId> {
        if self.order.is_empty() {
            return None;
        }
        let current = self.active.as_ref().and_then(|t| self.index_of(t)).unwrap_or(0) as isize;
        let len = self.order.len() as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        self.order.get(next).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TabController {
        TabController::new([
            (TabId::new("tab1"), FetchRequest::new("u1", "Crypto_Data", ["asset-list"])),
            (TabId::new("tab2"), FetchRequest::new("u2", "Exchanges_Data", ["exchange-list"])),
        ])
    }

    #[test]
    fn test_first_activation_issues_request() {
        let mut tabs = controller();
        let tab2 = TabId::new("tab2");
        let request = tabs.activate(&tab2).expect("request");
        assert_eq!(request.cache_key(), "Exchanges_Data");
        assert_eq!(tabs.status(&tab2), Some(TabStatus::Loading));
        assert!(tabs.is_visible(&tab2));
    }

    #[test]
    fn test_loading_or_loaded_tab_is_a_pure_switch() {
        let mut tabs = controller();
        let tab1 = TabId::new("tab1");
        let tab2 = TabId::new("tab2");

        assert!(tabs.activate(&tab1).is_some());
        assert!(tabs.activate(&tab2).is_some());
        assert!(tabs.activate(&tab1).is_none());
        assert!(tabs.is_visible(&tab1));

        tabs.resolve(&tab1, true);
        assert!(tabs.activate(&tab1).is_none());
        assert_eq!(tabs.status(&tab1), Some(TabStatus::Loaded));
    }

    #[test]
    fn test_failed_tab_retries_on_activation() {
        let mut tabs = controller();
        let tab1 = TabId::new("tab1");
        tabs.activate(&tab1);
        tabs.resolve(&tab1, false);
        assert_eq!(tabs.status(&tab1), Some(TabStatus::Failed));

        assert!(tabs.activate(&tab1).is_some());
        assert_eq!(tabs.status(&tab1), Some(TabStatus::Loading));
    }

    #[test]
    fn test_resolve_ignores_tabs_not_loading() {
        let mut tabs = controller();
        let tab1 = TabId::new("tab1");
        tabs.resolve(&tab1, true);
        assert_eq!(tabs.status(&tab1), Some(TabStatus::NotLoaded));
    }

    #[test]
    fn test_unknown_tab_is_ignored() {
        let mut tabs = controller();
        assert!(tabs.activate(&TabId::new("tab9")).is_none());
        assert!(tabs.active().is_none());
    }

    #[test]
    fn test_neighbour_wraps() {
        let mut tabs = controller();
        tabs.activate(&TabId::new("tab2"));
        assert_eq!(tabs.neighbour(1), Some(TabId::new("tab1")));
        assert_eq!(tabs.neighbour(-1), Some(TabId::new("tab1")));
        assert_eq!(tabs.tab_for_cache_key("Exchanges_Data"), Some(&TabId::new("tab2")));
    }
}
