//! Full-page advanced chart.

use ratatui::{layout::Rect, Frame};

use crate::render::CHART_CONTAINER;
use crate::state::App;
use crate::widgets::EmbedPanel;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let embedded = app.widgets.get(CHART_CONTAINER);
    EmbedPanel {
        container_id: CHART_CONTAINER,
        config: embedded.map(|e| &e.config),
        script_source: embedded.map(|e| e.script_source.as_str()),
        palette: &app.palette,
    }
    .render(f, area);
}
