use cryptoboard_client::{DispatchStatus, Page, PageLoad};
use cryptoboard_core::{Endpoint, FetchRequest, ThemeMode, WidgetKind};
use cryptoboard_storage::{LmdbStore, MemoryStore};
use cryptoboard_test_utils::fixtures::{self, BASE_URL};
use cryptoboard_test_utils::Harness;
use cryptoboard_tui::config::{DashboardConfig, ThemeConfig};
use cryptoboard_tui::events::FetchCompletion;
use cryptoboard_tui::keys::{map_key, map_prompt_key, Action, PromptKey};
use cryptoboard_tui::persistence;
use cryptoboard_tui::render::{GlobalStats, CHART_CONTAINER, MINI_CHART_CONTAINER, TICKER_CONTAINER};
use cryptoboard_tui::state::{App, Command};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use tempfile::TempDir;

fn base_config() -> DashboardConfig {
    DashboardConfig {
        api_base_url: "https://api.coingecko.com/api/v3".to_string(),
        request_timeout_ms: Some(10_000),
        tick_interval_ms: 250,
        cache_path: "tmp/cryptoboard-cache".into(),
        cache_max_size_mb: 64,
        cache_ttl_ms: 300_000,
        error_log_path: "tmp/cryptoboard-errors.log".into(),
        theme: ThemeConfig {
            default: "dark".to_string(),
        },
    }
}

fn home_harness() -> Harness {
    let harness = Harness::new();
    harness
        .transport
        .respond_json(Endpoint::Trending.url(BASE_URL), &fixtures::trending(7, 7));
    harness
        .transport
        .respond_json(Endpoint::Markets.url(BASE_URL), &fixtures::market_coins(20));
    harness
        .transport
        .respond_json(Endpoint::Global.url(BASE_URL), &fixtures::global());
    harness
}

async fn run_fetch(harness: &Harness, app: &mut App, request: FetchRequest) -> Option<DispatchStatus> {
    let outcome = harness.fetcher.fetch(&request).await;
    app.apply_fetch(FetchCompletion {
        generation: app.generation(),
        request,
        outcome,
    })
}

async fn run_load(harness: &Harness, app: &mut App, load: PageLoad) {
    let PageLoad { joined, independent } = load;
    let outcomes = harness.fetcher.fetch_all(&joined).await;
    for (request, outcome) in joined.into_iter().zip(outcomes) {
        app.apply_fetch(FetchCompletion {
            generation: app.generation(),
            request,
            outcome,
        });
    }
    for request in independent {
        run_fetch(harness, app, request).await;
    }
}

#[test]
fn shipped_sample_config_is_valid() {
    let config = DashboardConfig::from_toml(include_str!("../cryptoboard.toml")).unwrap();
    config.validate().unwrap();
    assert_eq!(config.cache_ttl_ms, 300_000);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.default_theme(), ThemeMode::Dark);
}

#[test]
fn config_requires_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "ftp://api.test".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_known_theme() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        default: "solarized".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_zero_ttl() {
    let mut config = base_config();
    config.cache_ttl_ms = 0;
    assert!(config.validate().is_err());
    assert!(base_config().validate().is_ok());
}

#[tokio::test]
async fn home_page_loads_every_region() {
    let harness = home_harness();
    let mut app = App::new(BASE_URL, Page::Home, ThemeMode::Dark);

    let load = app.start();
    assert_eq!(load.len(), 3);
    run_load(&harness, &mut app, load).await;

    assert_eq!(app.views.trending_coins.len(), 5);
    assert_eq!(app.views.trending_nfts.len(), 5);
    assert_eq!(app.views.assets.len(), 20);
    assert!(app.views.global.is_some());
    assert_ne!(app.views.global, Some(GlobalStats::unavailable()));
    assert!(!app.session().regions().any_loading());
    assert!(app.last_rendered().is_some());
    assert_eq!(harness.transport.call_count(), 3);
}

#[tokio::test]
async fn completion_for_a_left_page_is_dropped() {
    let harness = home_harness();
    let mut app = App::new(BASE_URL, Page::Home, ThemeMode::Dark);
    let load = app.start();
    let stale_generation = app.generation();

    app.navigate(Page::Chart);

    let request = load.joined[1].clone();
    let outcome = harness.fetcher.fetch(&request).await;
    let status = app.apply_fetch(FetchCompletion {
        generation: stale_generation,
        request,
        outcome,
    });

    assert_eq!(status, None);
    assert!(app.views.assets.is_empty());
    assert_eq!(app.page(), &Page::Chart);
}

#[tokio::test]
async fn global_failure_shows_not_available() {
    let harness = Harness::new();
    harness
        .transport
        .respond(Endpoint::Global.url(BASE_URL), 429, "{}");
    let mut app = App::new(BASE_URL, Page::Chart, ThemeMode::Dark);
    app.start();

    let status = run_fetch(&harness, &mut app, Endpoint::Global.request(BASE_URL)).await;

    assert_eq!(status, Some(DispatchStatus::Failed));
    assert_eq!(app.views.global, Some(GlobalStats::unavailable()));
    assert!(app.session().regions().has_error("global-stats"));
}

#[tokio::test]
async fn exchanges_tab_fetches_only_on_first_activation() {
    let harness = Harness::new();
    harness
        .transport
        .respond_json(Endpoint::Exchanges.url(BASE_URL), &fixtures::exchanges(25));
    let store = MemoryStore::new();
    let mut app = App::new(BASE_URL, Page::Home, ThemeMode::Dark);
    app.start();

    let request = match app.handle_action(Action::SwitchTab(1), &store) {
        Command::Fetch(request) => request,
        other => panic!("expected a fetch, got {:?}", other),
    };
    assert_eq!(request, Endpoint::Exchanges.request(BASE_URL));
    run_fetch(&harness, &mut app, request).await;
    assert_eq!(app.views.exchanges.len(), 20);

    assert_eq!(app.handle_action(Action::SwitchTab(0), &store), Command::Nothing);
    assert_eq!(app.handle_action(Action::SwitchTab(1), &store), Command::Nothing);
    assert_eq!(app.active_tab(), Some("tab2"));
    assert_eq!(harness.transport.call_count(), 1);
}

#[test]
fn theme_toggle_persists_and_rethemes_widgets() {
    let store = MemoryStore::new();
    let mut app = App::new(BASE_URL, Page::Chart, ThemeMode::Dark);
    app.start();
    assert_eq!(
        app.widgets.get(CHART_CONTAINER).and_then(|w| w.config.theme()),
        Some(ThemeMode::Dark.widget_theme())
    );

    let theme = app.toggle_theme(&store).unwrap();

    assert_eq!(theme, ThemeMode::Light);
    assert_eq!(persistence::load_theme(&store).unwrap(), Some(ThemeMode::Light));
    let chart = app.widgets.get(CHART_CONTAINER).expect("chart embedded");
    assert_eq!(chart.config.kind(), WidgetKind::AdvancedChart);
    assert_eq!(chart.config.theme(), Some(ThemeMode::Light.widget_theme()));
}

#[test]
fn toggled_theme_survives_restart() {
    let dir = TempDir::new().expect("temp dir");
    {
        let store = LmdbStore::open(dir.path(), 10).expect("open store");
        assert_eq!(persistence::load_theme(&store).unwrap(), None);
        let mut app = App::new(BASE_URL, Page::Home, ThemeMode::Dark);
        assert_eq!(app.handle_action(Action::ToggleTheme, &store), Command::Nothing);
        assert_eq!(app.theme(), ThemeMode::Light);
    }

    let store = LmdbStore::open(dir.path(), 10).expect("reopen store");
    assert_eq!(persistence::load_theme(&store).unwrap(), Some(ThemeMode::Light));
}

#[tokio::test]
async fn coin_page_embeds_ticker_and_overview() {
    let harness = Harness::new();
    let request = Endpoint::Coin("bitcoin".to_string()).request(BASE_URL);
    harness
        .transport
        .respond_json(request.url(), &fixtures::coin_detail("bitcoin", "btc"));
    let mut app = App::new(BASE_URL, Page::Coin("bitcoin".to_string()), ThemeMode::Light);
    app.start();

    let status = run_fetch(&harness, &mut app, request).await;

    assert_eq!(status, Some(DispatchStatus::Rendered));
    assert_eq!(app.widgets.len(), 2);
    let ticker = app.widgets.get(TICKER_CONTAINER).expect("ticker");
    assert_eq!(ticker.config.kind(), WidgetKind::SingleQuote);
    let overview = app.widgets.get(MINI_CHART_CONTAINER).expect("overview");
    assert_eq!(overview.config.theme(), Some(ThemeMode::Light.widget_theme()));
}

#[tokio::test]
async fn search_prompt_opens_results_and_coin_page() {
    let store = MemoryStore::new();
    let harness = Harness::new();
    harness.transport.respond_json(
        Endpoint::Search("bit".to_string()).url(BASE_URL),
        &fixtures::search_results(),
    );
    let mut app = App::new(BASE_URL, Page::Home, ThemeMode::Dark);
    app.start();

    assert_eq!(app.handle_action(Action::OpenSearch, &store), Command::Nothing);
    assert_eq!(app.prompt(), Some(""));
    assert_eq!(app.handle_prompt_key(PromptKey::Submit), Command::Nothing);
    assert_eq!(app.prompt(), Some(""));

    for c in "bit".chars() {
        app.handle_prompt_key(PromptKey::Insert(c));
    }
    let load = match app.handle_prompt_key(PromptKey::Submit) {
        Command::Load(load) => load,
        other => panic!("expected a page load, got {:?}", other),
    };
    assert_eq!(app.page(), &Page::Search(Some("bit".to_string())));
    assert_eq!(app.prompt(), None);

    let search = load.independent[0].clone();
    run_fetch(&harness, &mut app, search).await;
    let first = app
        .views
        .search
        .as_ref()
        .and_then(|s| s.coins.first())
        .map(|row| row.id.clone())
        .expect("coin results");

    match app.handle_action(Action::Open, &store) {
        Command::Load(_) => {}
        other => panic!("expected a page load, got {:?}", other),
    }
    assert_eq!(app.page(), &Page::Coin(first));
}

#[test]
fn escape_on_home_stays_put() {
    let store = MemoryStore::new();
    let mut app = App::new(BASE_URL, Page::Chart, ThemeMode::Dark);
    let generation = app.generation();

    assert!(matches!(app.handle_action(Action::GoHome, &store), Command::Load(_)));
    assert_eq!(app.page(), &Page::Home);
    assert_eq!(app.generation(), generation + 1);
    assert_eq!(app.handle_action(Action::GoHome, &store), Command::Nothing);
}

#[test]
fn ctrl_c_quits_everywhere() {
    let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(map_key(event), Some(Action::Quit));
    assert_eq!(map_prompt_key(event), Some(PromptKey::Cancel));
    assert_eq!(
        map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)),
        Some(Action::OpenChart)
    );
}

proptest! {
    #[test]
    fn keybinding_digit_switches_tab(digit in 0u8..=9u8) {
        let event = KeyEvent {
            code: KeyCode::Char((b'0' + digit) as char),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };
        let action = map_key(event);
        if (1..=4).contains(&digit) {
            prop_assert_eq!(action, Some(Action::SwitchTab(digit as usize - 1)));
        } else {
            prop_assert_eq!(action, None);
        }
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let (down, up) = if use_vim {
            (KeyCode::Char('j'), KeyCode::Char('k'))
        } else {
            (KeyCode::Down, KeyCode::Up)
        };
        prop_assert_eq!(map_key(KeyEvent::new(down, KeyModifiers::NONE)), Some(Action::MoveDown));
        prop_assert_eq!(map_key(KeyEvent::new(up, KeyModifiers::NONE)), Some(Action::MoveUp));
    }

    #[test]
    fn prompt_accepts_printable_text(c in "[a-zA-Z0-9 ]") {
        let ch = c.chars().next().unwrap_or('a');
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert_eq!(map_prompt_key(event), Some(PromptKey::Insert(ch)));
    }
}
