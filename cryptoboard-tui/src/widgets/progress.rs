//! Cache hit-rate gauge.

use cryptoboard_storage::CacheStats;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct HitRateGauge {
    pub stats: CacheStats,
    pub thresholds: (f64, f64),
    pub low_style: Style,
    pub mid_style: Style,
    pub high_style: Style,
}

impl HitRateGauge {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let ratio = self.stats.hit_rate().clamp(0.0, 1.0);
        let percent = ratio * 100.0;

        let style = if percent < self.thresholds.0 {
            self.low_style
        } else if percent < self.thresholds.1 {
            self.mid_style
        } else {
            self.high_style
        };

        let label = format!(
            "hits {} / misses {} / expired {} / writes {}",
            self.stats.hits, self.stats.misses, self.stats.expirations, self.stats.writes
        );
        let gauge = Gauge::default()
            .block(Block::default().title("Cache").borders(Borders::ALL))
            .gauge_style(style)
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, area);
    }
}
