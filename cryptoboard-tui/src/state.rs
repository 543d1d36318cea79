//! Application state.
//!
//! [`App`] owns the current [`PageSession`] and everything rendered for it.
//! Navigating opens a fresh session under a new generation, so completions
//! still in flight for the previous page are recognised and dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use cryptoboard_client::{DispatchStatus, Page, PageLoad, PageSession};
use cryptoboard_core::{Endpoint, FetchRequest, ThemeMode, WidgetConfig, WidgetHost, WidgetKind};
use cryptoboard_client::session::{TAB_ASSETS, TAB_CATEGORIES, TAB_COMPANIES, TAB_EXCHANGES};
use cryptoboard_storage::{CacheStats, KeyValueStore};

use crate::events::FetchCompletion;
use crate::keys::{Action, PromptKey};
use crate::nav::tab_at;
use crate::persistence::{self, PersistenceError};
use crate::render::{GlobalStats, Renderer, ViewData, CHART_CONTAINER};
use crate::theme::Palette;

/// Work the event loop has to carry out after an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nothing,
    Quit,
    Load(PageLoad),
    Fetch(FetchRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedWidget {
    pub config: WidgetConfig,
    pub script_source: String,
}

/// Widgets embedded on the current page, by container id.
#[derive(Debug, Clone, Default)]
pub struct WidgetBoard {
    embeds: BTreeMap<String, EmbeddedWidget>,
}

impl WidgetBoard {
    pub fn get(&self, container_id: &str) -> Option<&EmbeddedWidget> {
        self.embeds.get(container_id)
    }

    pub fn len(&self) -> usize {
        self.embeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeds.is_empty()
    }

    pub fn clear(&mut self) {
        self.embeds.clear();
    }

    /// Embed every current widget again with `theme` applied.
    pub fn retheme(&mut self, theme: ThemeMode) {
        let rethemed: Vec<(String, WidgetConfig)> = self
            .embeds
            .iter()
            .map(|(container, embedded)| {
                (container.clone(), with_theme(&embedded.config, container, theme))
            })
            .collect();
        for (container, config) in rethemed {
            self.embed(&container, &config);
        }
    }
}

impl WidgetHost for WidgetBoard {
    fn render_widget(&mut self, container_id: &str, config: &WidgetConfig, script_source: &str) {
        tracing::debug!(
            container = container_id,
            kind = config.kind().title(),
            symbol = config.symbol().unwrap_or("-"),
            "widget embedded"
        );
        self.embeds.insert(
            container_id.to_string(),
            EmbeddedWidget {
                config: config.clone(),
                script_source: script_source.to_string(),
            },
        );
    }
}

fn with_theme(config: &WidgetConfig, container_id: &str, theme: ThemeMode) -> WidgetConfig {
    let symbol = config.symbol().unwrap_or_default();
    match config.kind() {
        WidgetKind::SingleQuote => WidgetConfig::single_quote(symbol, theme),
        WidgetKind::SymbolOverview => WidgetConfig::symbol_overview(symbol, theme),
        WidgetKind::AdvancedChart => WidgetConfig::advanced_chart(container_id, theme),
    }
}

pub struct App {
    base_url: String,
    session: PageSession,
    generation: u64,
    pub views: ViewData,
    pub widgets: WidgetBoard,
    theme: ThemeMode,
    pub palette: Palette,
    selected: usize,
    prompt: Option<String>,
    cache_stats: CacheStats,
    last_rendered: Option<DateTime<Utc>>,
}

impl App {
    pub fn new(base_url: &str, page: Page, theme: ThemeMode) -> Self {
        let generation = 1;
        Self {
            base_url: base_url.to_string(),
            session: PageSession::open(page, generation, base_url),
            generation,
            views: ViewData::default(),
            widgets: WidgetBoard::default(),
            theme,
            palette: Palette::for_mode(theme),
            selected: 0,
            prompt: None,
            cache_stats: CacheStats::default(),
            last_rendered: None,
        }
    }

    /// Requests for the current page; widgets that need no data are
    /// embedded right away.
    pub fn start(&mut self) -> PageLoad {
        if matches!(self.session.page(), Page::Chart) {
            self.widgets.embed(
                CHART_CONTAINER,
                &WidgetConfig::advanced_chart(CHART_CONTAINER, self.theme),
            );
        }
        let load = self.session.initial_load();
        tracing::info!(
            page = %self.session.page().title(),
            generation = self.generation,
            requests = load.len(),
            "page opened"
        );
        load
    }

    /// Leave the current page for `page`, discarding all page state.
    pub fn navigate(&mut self, page: Page) -> PageLoad {
        self.generation += 1;
        self.session = PageSession::open(page, self.generation, &self.base_url);
        self.views = ViewData::default();
        self.widgets.clear();
        self.selected = 0;
        self.prompt = None;
        self.start()
    }

    pub fn reload(&mut self) -> PageLoad {
        let page = self.session.page().clone();
        self.navigate(page)
    }

    /// Apply a finished fetch. Returns `None` when it belongs to a page the
    /// user already left.
    pub fn apply_fetch(&mut self, completion: FetchCompletion) -> Option<DispatchStatus> {
        let FetchCompletion {
            generation,
            request,
            outcome,
        } = completion;

        if !self.session.accepts(generation) {
            tracing::debug!(
                cache_key = request.cache_key(),
                generation,
                current = self.generation,
                "stale completion dropped"
            );
            return None;
        }

        let theme = self.theme;
        let views = &mut self.views;
        let widgets = &mut self.widgets;
        let key = request.cache_key();
        let status = self.session.complete(&request, outcome, |data| {
            Renderer::new(views, widgets, theme).render(key, data)
        });

        if status.is_rendered() {
            self.last_rendered = Some(Utc::now());
        } else if Endpoint::from_cache_key(key) == Some(Endpoint::Global) {
            self.views.global = Some(GlobalStats::unavailable());
        }
        self.clamp_selection();
        Some(status)
    }

    pub fn handle_action<S: KeyValueStore + ?Sized>(&mut self, action: Action, store: &S) -> Command {
        match action {
            Action::Quit => Command::Quit,
            Action::NextTab => fetch_or_nothing(self.cycle_tab(1)),
            Action::PrevTab => fetch_or_nothing(self.cycle_tab(-1)),
            Action::SwitchTab(index) => fetch_or_nothing(self.activate_tab(index)),
            Action::MoveUp => {
                self.move_selection(-1);
                Command::Nothing
            }
            Action::MoveDown => {
                self.move_selection(1);
                Command::Nothing
            }
            Action::Open => match self.selected_coin() {
                Some(id) => Command::Load(self.navigate(Page::Coin(id))),
                None => Command::Nothing,
            },
            Action::OpenSearch => {
                self.prompt = Some(String::new());
                Command::Nothing
            }
            Action::OpenChart => Command::Load(self.navigate(Page::Chart)),
            Action::GoHome => {
                if matches!(self.session.page(), Page::Home) {
                    Command::Nothing
                } else {
                    Command::Load(self.navigate(Page::Home))
                }
            }
            Action::ToggleTheme => {
                if let Err(e) = self.toggle_theme(store) {
                    tracing::warn!(error = %e, "theme not saved");
                }
                Command::Nothing
            }
            Action::Reload => Command::Load(self.reload()),
        }
    }

    pub fn handle_prompt_key(&mut self, key: PromptKey) -> Command {
        let Some(input) = self.prompt.as_mut() else {
            return Command::Nothing;
        };
        match key {
            PromptKey::Insert(c) => input.push(c),
            PromptKey::Backspace => {
                input.pop();
            }
            PromptKey::Cancel => self.prompt = None,
            PromptKey::Submit => {
                let query = input.trim().to_string();
                if !query.is_empty() {
                    return Command::Load(self.navigate(Page::Search(Some(query))));
                }
            }
        }
        Command::Nothing
    }

    /// Switch to the home tab at `index`.
    pub fn activate_tab(&mut self, index: usize) -> Option<FetchRequest> {
        let tab = tab_at(index)?;
        self.select_tab(&tab)
    }

    pub fn cycle_tab(&mut self, offset: isize) -> Option<FetchRequest> {
        let tab = self.session.tabs()?.neighbour(offset)?;
        self.select_tab(&tab)
    }

    fn select_tab(&mut self, tab: &cryptoboard_core::TabId) -> Option<FetchRequest> {
        if self.session.tabs().and_then(|t| t.active()) != Some(tab) {
            self.selected = 0;
        }
        self.session.activate_tab(tab)
    }

    /// Flip dark/light, re-embed widgets with the new theme and persist it.
    pub fn toggle_theme<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> Result<ThemeMode, PersistenceError> {
        self.theme = self.theme.toggled();
        self.palette = Palette::for_mode(self.theme);
        self.widgets.retheme(self.theme);
        tracing::info!(theme = self.theme.storage_value(), "theme toggled");
        persistence::save_theme(store, self.theme)?;
        Ok(self.theme)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.selectable_rows();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.selectable_rows();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Rows the cursor moves over on the current page.
    pub fn selectable_rows(&self) -> usize {
        match self.session.page() {
            Page::Home => match self.active_tab() {
                Some(TAB_ASSETS) => self.views.assets.len(),
                Some(TAB_EXCHANGES) => self.views.exchanges.len(),
                Some(TAB_CATEGORIES) => self.views.categories.len(),
                Some(TAB_COMPANIES) => self.views.companies.len(),
                _ => 0,
            },
            Page::Search(_) => self.views.search.as_ref().map_or(0, |s| s.coins.len()),
            Page::Coin(_) | Page::Chart => 0,
        }
    }

    /// Coin id under the cursor, if the cursor is on a coin row.
    pub fn selected_coin(&self) -> Option<String> {
        match self.session.page() {
            Page::Home if self.active_tab() == Some(TAB_ASSETS) => {
                self.views.assets.get(self.selected).map(|row| row.id.clone())
            }
            Page::Search(_) => self
                .views
                .search
                .as_ref()
                .and_then(|s| s.coins.get(self.selected))
                .map(|row| row.id.clone()),
            _ => None,
        }
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.session.tabs()?.active().map(|t| t.as_str())
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn page(&self) -> &Page {
        self.session.page()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache_stats
    }

    pub fn set_cache_stats(&mut self, stats: CacheStats) {
        self.cache_stats = stats;
    }

    pub fn last_rendered(&self) -> Option<DateTime<Utc>> {
        self.last_rendered
    }
}

fn fetch_or_nothing(request: Option<FetchRequest>) -> Command {
    request.map(Command::Fetch).unwrap_or(Command::Nothing)
}
