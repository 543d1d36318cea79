//! Cryptoboard TUI entry point.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use cryptoboard_client::{Fetcher, PageLoad, ReqwestTransport, Transport};
use cryptoboard_core::{FetchRequest, Millis, SystemClock};
use cryptoboard_storage::{ExpiringCache, LmdbStore};
use cryptoboard_tui::config::DashboardConfig;
use cryptoboard_tui::error::TuiError;
use cryptoboard_tui::events::{FetchCompletion, TuiEvent};
use cryptoboard_tui::keys::{map_key, map_prompt_key};
use cryptoboard_tui::logging;
use cryptoboard_tui::nav::PageArgs;
use cryptoboard_tui::persistence;
use cryptoboard_tui::state::{App, Command};
use cryptoboard_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

type DashboardFetcher = Fetcher<Arc<LmdbStore>, SystemClock>;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = DashboardConfig::load()?;
    logging::init(&config.error_log_path)?;

    let store = Arc::new(LmdbStore::open(&config.cache_path, config.cache_max_size_mb)?);
    let ttl = Millis::try_from(config.cache_ttl_ms).unwrap_or(Millis::MAX);
    let cache = Arc::new(ExpiringCache::with_ttl(Arc::clone(&store), SystemClock, ttl));
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(config.request_timeout())?);
    let fetcher: DashboardFetcher = Fetcher::new(transport, cache);

    let theme = match persistence::load_theme(store.as_ref()) {
        Ok(Some(theme)) => theme,
        Ok(None) => config.default_theme(),
        Err(e) => {
            tracing::warn!(error = %e, "stored theme unreadable");
            config.default_theme()
        }
    };
    let mut app = App::new(config.base_url(), PageArgs::from_env().page(), theme);
    tracing::info!(base_url = config.base_url(), "dashboard starting");

    let (mut terminal, _guard) = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());
    spawn_page_load(&fetcher, app.generation(), app.start(), &event_tx);

    let mut ticker = tokio::time::interval(config.tick_interval());

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.set_cache_stats(fetcher.cache_stats());
            }
            Some(event) = event_rx.recv() => {
                let command = handle_event(&mut app, event, store.as_ref());
                app.set_cache_stats(fetcher.cache_stats());
                match command {
                    Command::Quit => break,
                    Command::Load(load) => spawn_page_load(&fetcher, app.generation(), load, &event_tx),
                    Command::Fetch(request) => spawn_fetch(&fetcher, app.generation(), request, &event_tx),
                    Command::Nothing => {}
                }
            }
        }
    }

    tracing::info!("dashboard stopped");
    Ok(())
}

/// The guard exists from the moment raw mode is on, so a failure further
/// down still restores the terminal.
fn setup_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, TerminalGuard), TuiError> {
    enable_raw_mode()?;
    let guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok((terminal, guard))
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let event = match evt {
                    CrosstermEvent::Key(key) => TuiEvent::Input(key),
                    CrosstermEvent::Resize(width, height) => TuiEvent::Resize { width, height },
                    _ => continue,
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}

/// The joined group resolves together and is delivered in order; every
/// independent request completes on its own.
fn spawn_page_load(
    fetcher: &DashboardFetcher,
    generation: u64,
    load: PageLoad,
    sender: &mpsc::Sender<TuiEvent>,
) {
    let PageLoad { joined, independent } = load;
    if !joined.is_empty() {
        let fetcher = fetcher.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let outcomes = fetcher.fetch_all(&joined).await;
            for (request, outcome) in joined.into_iter().zip(outcomes) {
                let completion = FetchCompletion {
                    generation,
                    request,
                    outcome,
                };
                if sender.send(TuiEvent::Fetched(Box::new(completion))).await.is_err() {
                    break;
                }
            }
        });
    }
    for request in independent {
        spawn_fetch(fetcher, generation, request, sender);
    }
}

fn spawn_fetch(
    fetcher: &DashboardFetcher,
    generation: u64,
    request: FetchRequest,
    sender: &mpsc::Sender<TuiEvent>,
) {
    let fetcher = fetcher.clone();
    let sender = sender.clone();
    tokio::spawn(async move {
        let outcome = fetcher.fetch(&request).await;
        let completion = FetchCompletion {
            generation,
            request,
            outcome,
        };
        let _ = sender.send(TuiEvent::Fetched(Box::new(completion))).await;
    });
}

fn handle_event(app: &mut App, event: TuiEvent, store: &LmdbStore) -> Command {
    match event {
        TuiEvent::Input(key) => {
            if app.prompt().is_some() {
                return map_prompt_key(key)
                    .map(|k| app.handle_prompt_key(k))
                    .unwrap_or(Command::Nothing);
            }
            map_key(key)
                .map(|action| app.handle_action(action, store))
                .unwrap_or(Command::Nothing)
        }
        TuiEvent::Fetched(completion) => {
            app.apply_fetch(*completion);
            Command::Nothing
        }
        TuiEvent::Resize { .. } | TuiEvent::Tick => Command::Nothing,
    }
}
