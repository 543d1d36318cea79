//! Coin detail page.

use cryptoboard_core::endpoints::TARGET_COIN_INFO;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::helpers::region_ready;
use crate::render::{DESCRIPTION_FALLBACK, MINI_CHART_CONTAINER, TICKER_CONTAINER};
use crate::state::App;
use crate::widgets::{DetailPanel, EmbedPanel, RegionStatus};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = &app.palette;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let status = RegionStatus::of(app.session().regions(), TARGET_COIN_INFO);
    if !region_ready(f, columns[0], status, "Coin", palette) {
        render_widgets(f, app, columns[1]);
        return;
    }
    let Some(coin) = app.views.coin.as_ref() else {
        return;
    };

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(columns[0]);

    let label_style = Style::default().fg(palette.text_dim);
    let border_style = Style::default().fg(palette.border);

    let heading = Paragraph::new(Line::from(vec![
        Span::styled(
            coin.title.clone(),
            Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(coin.rank.clone(), label_style),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(border_style));
    f.render_widget(heading, left[0]);

    DetailPanel {
        title: "Overview",
        fields: &coin.overview,
        label_style,
        border_style,
    }
    .render(f, left[1]);

    DetailPanel {
        title: "Historical Info",
        fields: &coin.historical,
        label_style,
        border_style,
    }
    .render(f, left[2]);

    let market_lines: Vec<Line> = coin
        .markets
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::styled(format!("{}: ", m.name), label_style),
                Span::raw(m.trade_url.clone()),
                Span::styled(format!("  trust {}", m.trust_score), label_style),
            ])
        })
        .collect();
    let markets = Paragraph::new(market_lines).block(
        Block::default()
            .title("Markets")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(markets, left[3]);

    DetailPanel {
        title: "Info",
        fields: &coin.links,
        label_style,
        border_style,
    }
    .render(f, left[4]);

    render_widgets(f, app, columns[1]);
}

fn render_widgets(f: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = &app.palette;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(area);

    for (container, row) in [(TICKER_CONTAINER, rows[0]), (MINI_CHART_CONTAINER, rows[1])] {
        let embedded = app.widgets.get(container);
        EmbedPanel {
            container_id: container,
            config: embedded.map(|e| &e.config),
            script_source: embedded.map(|e| e.script_source.as_str()),
            palette,
        }
        .render(f, row);
    }

    let (text, style) = match app.views.coin.as_ref() {
        Some(coin) if coin.description != DESCRIPTION_FALLBACK => {
            (coin.description.clone(), Style::default().fg(palette.text))
        }
        Some(_) => (DESCRIPTION_FALLBACK.to_string(), Style::default().fg(palette.error)),
        None => (String::new(), Style::default()),
    };
    let description = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Description")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    f.render_widget(description, rows[2]);
}
