//! Search results page.

use cryptoboard_client::Page;
use cryptoboard_core::endpoints::{TARGET_SEARCH_COINS, TARGET_SEARCH_EXCHANGES, TARGET_SEARCH_NFTS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row},
    Frame,
};

use super::helpers::{region_ready, DataTable};
use crate::render::{SearchRow, SearchView, NO_QUERY_BODY, NO_QUERY_HEADING};
use crate::state::App;
use crate::widgets::RegionStatus;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = &app.palette;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query = match app.page() {
        Page::Search(Some(query)) => query.as_str(),
        _ => {
            render_heading(f, app, layout[0], NO_QUERY_HEADING.to_string());
            let body = Paragraph::new(NO_QUERY_BODY)
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.error));
            f.render_widget(body, layout[1]);
            return;
        }
    };
    render_heading(f, app, layout[0], SearchView::heading(query));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(layout[1]);

    let empty = SearchView::default();
    let results = app.views.search.as_ref().unwrap_or(&empty);

    let sections: [(&str, &str, &str, [&str; 2], &[SearchRow], Option<usize>); 3] = [
        ("Coins", "coins", TARGET_SEARCH_COINS, ["Rank", "Coin"], results.coins.as_slice(), Some(app.selected())),
        ("Exchanges", "exchanges", TARGET_SEARCH_EXCHANGES, ["Exchange", "Market"], results.exchanges.as_slice(), None),
        ("NFTs", "nfts", TARGET_SEARCH_NFTS, ["NFT", "Symbol"], results.nfts.as_slice(), None),
    ];

    for ((title, category, target, headers, rows, selected), area) in sections.into_iter().zip(columns.iter().copied()) {
        let status = RegionStatus::of(app.session().regions(), target);
        if !region_ready(f, area, status, title, palette) {
            continue;
        }
        if rows.is_empty() {
            let message = Paragraph::new(SearchView::empty_message(category))
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.error))
                .block(Block::default().title(title).borders(Borders::ALL));
            f.render_widget(message, area);
            continue;
        }
        // Coins list rank first; the other two lead with the name.
        let rows = rows
            .iter()
            .map(|row| {
                if target == TARGET_SEARCH_COINS {
                    Row::new(vec![row.detail.clone(), row.label.clone()])
                } else {
                    Row::new(vec![row.label.clone(), row.detail.clone()])
                }
            })
            .collect();
        let widths = if target == TARGET_SEARCH_COINS {
            [Constraint::Length(6), Constraint::Min(10)]
        } else {
            [Constraint::Min(10), Constraint::Length(10)]
        };
        DataTable {
            title,
            headers: &headers,
            widths: &widths,
            rows,
            selected,
        }
        .render(f, area, palette);
    }
}

fn render_heading(f: &mut Frame<'_>, app: &App, area: Rect, heading: String) {
    let palette = &app.palette;
    let widget = Paragraph::new(heading)
        .style(Style::default().fg(palette.primary).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    f.render_widget(widget, area);
}
