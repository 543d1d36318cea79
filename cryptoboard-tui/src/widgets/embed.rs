//! Placeholder for an embedded third-party widget.
//!
//! The terminal cannot run the widget script, so the panel shows what was
//! embedded into the container: widget kind, symbol, theme and script.

use cryptoboard_core::WidgetConfig;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::theme::{css_rgba, Palette};

pub struct EmbedPanel<'a> {
    pub container_id: &'a str,
    pub config: Option<&'a WidgetConfig>,
    pub script_source: Option<&'a str>,
    pub palette: &'a Palette,
}

impl<'a> EmbedPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let label = Style::default().fg(self.palette.text_dim);
        let lines = match self.config {
            Some(config) => {
                let setting = |key: &str| {
                    config
                        .settings()
                        .get(key)
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                };
                let mut lines = vec![
                    Line::from(vec![
                        Span::styled("Symbol: ", label),
                        Span::raw(config.symbol().unwrap_or("-").to_string()),
                    ]),
                    Line::from(vec![
                        Span::styled("Theme: ", label),
                        Span::raw(config.theme().unwrap_or("-").to_string()),
                    ]),
                ];
                if let Some(interval) = setting("interval") {
                    lines.push(Line::from(vec![
                        Span::styled("Interval: ", label),
                        Span::raw(interval),
                    ]));
                }
                let background = setting("backgroundColor");
                if let Some(background) = background.as_deref() {
                    let swatch = css_rgba(background)
                        .map(|c| Style::default().bg(c))
                        .unwrap_or_default();
                    lines.push(Line::from(vec![
                        Span::styled("Background: ", label),
                        Span::styled("   ", swatch),
                        Span::raw(format!(" {}", background)),
                    ]));
                }
                if let Some(script) = self.script_source {
                    lines.push(Line::from(vec![
                        Span::styled("Script: ", label),
                        Span::raw(script.to_string()),
                    ]));
                }
                lines
            }
            None => vec![Line::from(Span::styled("Waiting for data...", label))],
        };

        let title = self
            .config
            .map(|c| format!("{} [{}]", c.kind().title(), self.container_id))
            .unwrap_or_else(|| self.container_id.to_string());
        let widget = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.palette.border)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}
