//! Page sessions.
//!
//! Each page the user opens gets a fresh [`PageSession`]: its own regions,
//! its own tab state and a generation number. Fetch completions carry the
//! generation they were issued under, so a result that arrives after the
//! user navigated away is recognised and dropped.

use std::collections::BTreeSet;

use cryptoboard_core::endpoints::{
    TARGET_ASSETS, TARGET_CATEGORIES, TARGET_COMPANIES, TARGET_EXCHANGES,
};
use cryptoboard_core::{Endpoint, FetchOutcome, FetchRequest, TabId, TargetId};
use serde_json::Value;

use crate::dispatch::{DispatchStatus, RegionBoard, RenderDispatcher, RenderError};
use crate::tabs::TabController;

pub const TAB_ASSETS: &str = "tab1";
pub const TAB_EXCHANGES: &str = "tab2";
pub const TAB_CATEGORIES: &str = "tab3";
pub const TAB_COMPANIES: &str = "tab4";

/// Home page tabs in display order: id, label, endpoint.
pub fn home_tab_specs() -> [(&'static str, &'static str, Endpoint); 4] {
    [
        (TAB_ASSETS, "Assets", Endpoint::Markets),
        (TAB_EXCHANGES, "Exchanges", Endpoint::Exchanges),
        (TAB_CATEGORIES, "Categories", Endpoint::Categories),
        (TAB_COMPANIES, "Companies", Endpoint::PublicTreasury),
    ]
}

pub fn home_tabs(base_url: &str) -> TabController {
    TabController::new(
        home_tab_specs()
            .into_iter()
            .map(|(id, _, endpoint)| (TabId::new(id), endpoint.request(base_url))),
    )
}

/// A page of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Coin(String),
    Search(Option<String>),
    Chart,
}

impl Page {
    /// Page selected by the `coin` / `query` parameters.
    ///
    /// A blank coin id falls back to the home page; a blank query is a
    /// search page with nothing to search.
    pub fn from_params(coin: Option<&str>, query: Option<&str>, chart: bool) -> Self {
        if let Some(id) = coin.map(str::trim).filter(|id| !id.is_empty()) {
            return Page::Coin(id.to_string());
        }
        if let Some(query) = query {
            let query = query.trim();
            return Page::Search((!query.is_empty()).then(|| query.to_string()));
        }
        if chart {
            return Page::Chart;
        }
        Page::Home
    }

    pub fn title(&self) -> String {
        match self {
            Page::Home => "Home".to_string(),
            Page::Coin(id) => format!("Coin: {}", id),
            Page::Search(Some(q)) => format!("Search: {}", q),
            Page::Search(None) => "Search".to_string(),
            Page::Chart => "Chart".to_string(),
        }
    }

    /// Endpoints whose regions exist on this page.
    fn endpoints(&self) -> Vec<Endpoint> {
        let mut endpoints = vec![Endpoint::Global];
        match self {
            Page::Home => {
                endpoints.push(Endpoint::Trending);
                endpoints.extend(home_tab_specs().into_iter().map(|(_, _, e)| e));
            }
            Page::Coin(id) => endpoints.push(Endpoint::Coin(id.clone())),
            Page::Search(Some(query)) => endpoints.push(Endpoint::Search(query.clone())),
            Page::Search(None) | Page::Chart => {}
        }
        endpoints
    }
}

/// Requests to issue when a page opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLoad {
    /// Issued together; the caller waits for all of them.
    pub joined: Vec<FetchRequest>,
    /// Issued on their own.
    pub independent: Vec<FetchRequest>,
}

impl PageLoad {
    pub fn all(&self) -> impl Iterator<Item = &FetchRequest> {
        self.joined.iter().chain(self.independent.iter())
    }

    pub fn len(&self) -> usize {
        self.joined.len() + self.independent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// UI state scoped to one visit of one page.
#[derive(Debug, Clone)]
pub struct PageSession {
    page: Page,
    generation: u64,
    base_url: String,
    regions: RegionBoard,
    tabs: Option<TabController>,
}

impl PageSession {
    pub fn open(page: Page, generation: u64, base_url: &str) -> Self {
        let mut regions = RegionBoard::new();
        for endpoint in page.endpoints() {
            for target in endpoint.targets() {
                regions.register(target);
            }
        }
        let tabs = matches!(page, Page::Home).then(|| home_tabs(base_url));
        Self {
            page,
            generation,
            base_url: base_url.to_string(),
            regions,
            tabs,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn regions(&self) -> &RegionBoard {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut RegionBoard {
        &mut self.regions
    }

    pub fn tabs(&self) -> Option<&TabController> {
        self.tabs.as_ref()
    }

    /// Whether a completion issued under `generation` belongs here.
    pub fn accepts(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Requests for the initial load, with their regions already showing
    /// loading indicators.
    ///
    /// On the home page the first tab is activated, and its request joins
    /// the trending request instead of being issued twice. Global stats
    /// load on every page.
    pub fn initial_load(&mut self) -> PageLoad {
        let mut load = PageLoad::default();
        match &self.page {
            Page::Home => {
                load.joined.push(Endpoint::Trending.request(&self.base_url));
                if let Some(request) = self
                    .tabs
                    .as_mut()
                    .and_then(|tabs| tabs.activate(&TabId::new(TAB_ASSETS)))
                {
                    load.joined.push(request);
                }
            }
            Page::Coin(id) => load
                .independent
                .push(Endpoint::Coin(id.clone()).request(&self.base_url)),
            Page::Search(Some(query)) => load
                .independent
                .push(Endpoint::Search(query.clone()).request(&self.base_url)),
            Page::Search(None) | Page::Chart => {}
        }
        load.independent.push(Endpoint::Global.request(&self.base_url));

        for request in load.all() {
            RenderDispatcher::new(&mut self.regions).prepare(request.target_ids());
        }
        load
    }

    /// Switch tabs, returning the request to issue if the tab needs one.
    pub fn activate_tab(&mut self, tab: &TabId) -> Option<FetchRequest> {
        let request = self.tabs.as_mut()?.activate(tab)?;
        RenderDispatcher::new(&mut self.regions).prepare(request.target_ids());
        Some(request)
    }

    /// Apply a completed fetch: drive the indicators, run `render` on
    /// success and settle the owning tab, if any.
    pub fn complete<F>(&mut self, request: &FetchRequest, outcome: FetchOutcome, render: F) -> DispatchStatus
    where
        F: FnOnce(Value) -> Result<(), RenderError>,
    {
        let status =
            RenderDispatcher::new(&mut self.regions).dispatch(outcome, request.target_ids(), render);

        if let Some(tabs) = self.tabs.as_mut() {
            if let Some(tab) = tabs.tab_for_cache_key(request.cache_key()).cloned() {
                tabs.resolve(&tab, status.is_rendered());
            }
        }
        status
    }

    /// Region ids rendered by the given home tab.
    pub fn tab_regions(tab: &str) -> BTreeSet<TargetId> {
        let id = match tab {
            TAB_ASSETS => TARGET_ASSETS,
            TAB_EXCHANGES => TARGET_EXCHANGES,
            TAB_CATEGORIES => TARGET_CATEGORIES,
            TAB_COMPANIES => TARGET_COMPANIES,
            _ => return BTreeSet::new(),
        };
        BTreeSet::from([TargetId::new(id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoboard_core::TabStatus;
    use serde_json::json;

    const BASE: &str = "https://api.test";

    #[test]
    fn test_page_from_params() {
        assert_eq!(Page::from_params(Some("bitcoin"), None, false), Page::Coin("bitcoin".into()));
        assert_eq!(Page::from_params(Some("  "), None, false), Page::Home);
        assert_eq!(Page::from_params(None, Some("eth"), false), Page::Search(Some("eth".into())));
        assert_eq!(Page::from_params(None, Some(""), false), Page::Search(None));
        assert_eq!(Page::from_params(None, None, true), Page::Chart);
    }

    #[test]
    fn test_home_load_joins_trending_and_first_tab() {
        let mut session = PageSession::open(Page::Home, 1, BASE);
        let load = session.initial_load();

        let joined: Vec<&str> = load.joined.iter().map(|r| r.cache_key()).collect();
        assert_eq!(joined, vec!["Trending_data", "Crypto_Data"]);
        let independent: Vec<&str> = load.independent.iter().map(|r| r.cache_key()).collect();
        assert_eq!(independent, vec!["Global_Data"]);

        let tabs = session.tabs().expect("home has tabs");
        assert_eq!(tabs.status(&TabId::new(TAB_ASSETS)), Some(TabStatus::Loading));
        assert!(session.regions().is_loading("asset-list"));
        assert!(session.regions().is_loading("coins-list"));
        assert!(session.regions().is_loading("global-stats"));
    }

    #[test]
    fn test_completion_settles_owning_tab() {
        let mut session = PageSession::open(Page::Home, 1, BASE);
        let load = session.initial_load();
        let markets = load.joined[1].clone();

        let status = session.complete(&markets, FetchOutcome::Success(json!([])), |_| Ok(()));
        assert!(status.is_rendered());
        let tabs = session.tabs().expect("tabs");
        assert_eq!(tabs.status(&TabId::new(TAB_ASSETS)), Some(TabStatus::Loaded));
        assert!(!session.regions().is_loading("asset-list"));
    }

    #[test]
    fn test_failed_tab_shows_error_and_can_retry() {
        let mut session = PageSession::open(Page::Home, 1, BASE);
        let tab2 = TabId::new(TAB_EXCHANGES);
        let request = session.activate_tab(&tab2).expect("request");
        session.complete(&request, FetchOutcome::Failure("API limit reached".into()), |_| Ok(()));

        assert!(session.regions().has_error("exchange-list"));
        let retry = session.activate_tab(&tab2).expect("retry");
        assert_eq!(retry.cache_key(), "Exchanges_Data");
        assert!(!session.regions().has_error("exchange-list"));
    }

    #[test]
    fn test_coin_and_search_pages() {
        let mut coin = PageSession::open(Page::Coin("bitcoin".into()), 2, BASE);
        let load = coin.initial_load();
        let keys: Vec<&str> = load.all().map(|r| r.cache_key()).collect();
        assert_eq!(keys, vec!["Coin_bitcoin", "Global_Data"]);
        assert!(coin.tabs().is_none());

        let mut empty = PageSession::open(Page::Search(None), 3, BASE);
        assert_eq!(empty.initial_load().len(), 1);
    }

    #[test]
    fn test_generation_check() {
        let session = PageSession::open(Page::Chart, 7, BASE);
        assert!(session.accepts(7));
        assert!(!session.accepts(6));
    }

    #[test]
    fn test_tab_regions() {
        assert!(PageSession::tab_regions(TAB_COMPANIES).contains(&TargetId::new("company-list")));
        assert!(PageSession::tab_regions("tab9").is_empty());
    }
}
