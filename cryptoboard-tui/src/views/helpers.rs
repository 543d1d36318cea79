//! Table helpers shared by the page views.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::theme::{change_color, Palette};
use crate::widgets::RegionStatus;

/// Cell showing a signed change in green or red.
pub fn change_cell(text: String, change: Option<f64>, palette: &Palette) -> Cell<'static> {
    Cell::from(Span::styled(text, Style::default().fg(change_color(change, palette))))
}

pub struct DataTable<'a> {
    pub title: &'a str,
    pub headers: &'a [&'a str],
    pub widths: &'a [Constraint],
    pub rows: Vec<Row<'a>>,
    pub selected: Option<usize>,
}

impl<'a> DataTable<'a> {
    pub fn render(self, f: &mut Frame<'_>, area: Rect, palette: &Palette) {
        let header = Row::new(self.headers.iter().copied()).style(
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        );
        let table = Table::new(self.rows, self.widths.iter().copied())
            .header(header)
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.border)),
            )
            .highlight_style(Style::default().bg(palette.bg_highlight))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(self.selected);
        f.render_stateful_widget(table, area, &mut state);
    }
}

/// Render the loading/error placeholder for a region that is not ready.
/// Returns `true` if the region still needs its content drawn.
pub fn region_ready(
    f: &mut Frame<'_>,
    area: Rect,
    status: RegionStatus,
    title: &str,
    palette: &Palette,
) -> bool {
    match status.indicator(title, palette) {
        Some(indicator) => {
            indicator.render(f, area);
            false
        }
        None => true,
    }
}
