//! View rendering dispatch.

pub mod chart;
pub mod coin;
pub mod helpers;
pub mod home;
pub mod search;

use cryptoboard_client::Page;
use cryptoboard_core::endpoints::TARGET_GLOBAL_STATS;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::App;
use crate::theme::change_color;
use crate::widgets::{HitRateGauge, RegionStatus};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let palette = &app.palette;
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.text)),
        f.size(),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.page() {
        Page::Home => home::render(f, app, layout[1]),
        Page::Coin(_) => coin::render(f, app, layout[1]),
        Page::Search(_) => search::render(f, app, layout[1]),
        Page::Chart => chart::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = &app.palette;
    let title = format!(
        "CRYPTOBOARD | {} | {}",
        app.page().title(),
        app.theme().widget_theme()
    );
    let dim = Style::default().fg(palette.text_dim);

    let line = match (RegionStatus::of(app.session().regions(), TARGET_GLOBAL_STATS), &app.views.global) {
        (RegionStatus::Loading, _) => Line::from(Span::styled("Loading global stats...", Style::default().fg(palette.loading))),
        (_, Some(stats)) => {
            let arrow = match stats.market_cap_change {
                Some(c) if c < 0.0 => " ▼",
                Some(_) => " ▲",
                None => "",
            };
            Line::from(vec![
                Span::styled("Coins: ", dim),
                Span::raw(stats.coins.clone()),
                Span::styled("  Exchanges: ", dim),
                Span::raw(stats.exchanges.clone()),
                Span::styled("  Market Cap: ", dim),
                Span::raw(stats.market_cap.clone()),
                Span::raw(" "),
                Span::styled(
                    format!("{}{}", stats.market_cap_change_text(), arrow),
                    Style::default().fg(change_color(stats.market_cap_change, palette)),
                ),
                Span::styled("  24h Vol: ", dim),
                Span::raw(stats.volume.clone()),
                Span::styled("  Dominance: ", dim),
                Span::raw(stats.dominance.clone()),
            ])
        }
        (_, None) => Line::from(Span::styled("-", dim)),
    };

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                title,
                Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = &app.palette;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(52)])
        .split(area);

    let (text, style) = match app.prompt() {
        Some(input) => (
            format!("Search: {}_   (Enter search • Esc cancel)", input),
            Style::default().fg(palette.primary),
        ),
        None => {
            let updated = app
                .last_rendered()
                .map(|t| format!(" • updated {}", t.format("%H:%M:%S UTC")))
                .unwrap_or_default();
            (
                format!(
                    "1-4 tabs • ←/→ switch • ↑/↓ move • Enter open • / search • c chart • t theme • Esc home • q quit{}",
                    updated
                ),
                Style::default().fg(palette.text_dim),
            )
        }
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .style(style);
    f.render_widget(footer, columns[0]);

    HitRateGauge {
        stats: app.cache_stats(),
        thresholds: (25.0, 60.0),
        low_style: Style::default().fg(palette.down),
        mid_style: Style::default().fg(palette.loading),
        high_style: Style::default().fg(palette.up),
    }
    .render(f, columns[1]);
}
