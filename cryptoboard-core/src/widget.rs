//! Third-party chart widget configuration and the host capability that
//! embeds them.
//!
//! The dashboard never draws these charts itself. It builds a configuration
//! object and hands it, together with the widget script, to whatever
//! [`WidgetHost`] the page runs in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const SINGLE_QUOTE_SCRIPT: &str =
    "https://s3.tradingview.com/external-embedding/embed-widget-single-quote.js";
pub const SYMBOL_OVERVIEW_SCRIPT: &str =
    "https://s3.tradingview.com/external-embedding/embed-widget-symbol-overview.js";
pub const ADVANCED_CHART_SCRIPT: &str =
    "https://s3.tradingview.com/external-embedding/embed-widget-advanced-chart.js";

pub const DEFAULT_CHART_SYMBOL: &str = "BINANCE:BTCUSDT";

/// Colour scheme selected by the user, persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Value stored under the `theme` key of the key/value store.
    pub fn storage_value(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark-theme",
            ThemeMode::Light => "light-theme",
        }
    }

    /// Only an explicit light value selects the light theme.
    pub fn from_storage_value(value: Option<&str>) -> Self {
        match value {
            Some("light-theme") => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Theme name understood by the widget scripts.
    pub fn widget_theme(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn chart_background(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "rgba(14, 18, 24, 1)",
            ThemeMode::Light => "rgba(255, 255, 255, 1)",
        }
    }

    pub fn chart_grid(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "rgba(76, 175, 80, 0.06)",
            ThemeMode::Light => "rgba(42, 46, 57, 0.06)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    SingleQuote,
    SymbolOverview,
    AdvancedChart,
}

impl WidgetKind {
    pub fn script_source(&self) -> &'static str {
        match self {
            WidgetKind::SingleQuote => SINGLE_QUOTE_SCRIPT,
            WidgetKind::SymbolOverview => SYMBOL_OVERVIEW_SCRIPT,
            WidgetKind::AdvancedChart => ADVANCED_CHART_SCRIPT,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::SingleQuote => "Quote",
            WidgetKind::SymbolOverview => "Overview",
            WidgetKind::AdvancedChart => "Chart",
        }
    }
}

/// Opaque configuration object passed through to a widget script.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    kind: WidgetKind,
    settings: Value,
}

impl WidgetConfig {
    pub fn single_quote(symbol: &str, theme: ThemeMode) -> Self {
        Self {
            kind: WidgetKind::SingleQuote,
            settings: json!({
                "symbol": symbol,
                "width": "100%",
                "isTransparent": true,
                "colorTheme": theme.widget_theme(),
                "locale": "en",
            }),
        }
    }

    pub fn symbol_overview(symbol: &str, theme: ThemeMode) -> Self {
        Self {
            kind: WidgetKind::SymbolOverview,
            settings: json!({
                "symbols": [[format!("{}|1D", symbol)]],
                "chartOnly": false,
                "width": "100%",
                "height": "100%",
                "locale": "en",
                "colorTheme": theme.widget_theme(),
                "autosize": true,
                "showVolume": false,
                "showMA": false,
                "hideDateRanges": false,
                "hideMarketStatus": false,
                "hideSymbolLogo": true,
                "scalePosition": "right",
                "scaleMode": "Normal",
                "fontSize": "10",
                "noTimeScale": false,
                "valuesTracking": "1",
                "changeMode": "price-and-percent",
                "chartType": "area",
                "maLineColor": "#2962FF",
                "maLineWidth": 1,
                "maLength": 9,
                "headerFontSize": "medium",
                "backgroundColor": theme.chart_background(),
                "gridLineColor": theme.chart_grid(),
                "lineWidth": 2,
                "lineType": 0,
                "dateRanges": ["1d|15", "1m|30", "3m|60", "12m|1D", "60m|1W", "all|1M"],
                "dateFormat": "yyyy-MM-dd",
            }),
        }
    }

    pub fn advanced_chart(container_id: &str, theme: ThemeMode) -> Self {
        Self {
            kind: WidgetKind::AdvancedChart,
            settings: json!({
                "autosize": true,
                "symbol": DEFAULT_CHART_SYMBOL,
                "interval": "4H",
                "timezone": "Etc/UTC",
                "theme": theme.widget_theme(),
                "style": "1",
                "locale": "en",
                "container_id": container_id,
                "backgroundColor": theme.chart_background(),
                "gridColor": theme.chart_grid(),
                "hide_side_toolbar": false,
                "allow_symbol_change": true,
                "save_image": true,
                "details": true,
                "calendar": false,
                "support_host": "https://www.tradingview.com",
            }),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Primary symbol shown by the widget.
    pub fn symbol(&self) -> Option<&str> {
        self.settings
            .get("symbol")
            .and_then(Value::as_str)
            .or_else(|| {
                self.settings
                    .get("symbols")
                    .and_then(|s| s.get(0))
                    .and_then(|s| s.get(0))
                    .and_then(Value::as_str)
                    .and_then(|s| s.split('|').next())
            })
    }

    /// Widget theme name carried in the configuration.
    pub fn theme(&self) -> Option<&str> {
        self.settings
            .get("colorTheme")
            .or_else(|| self.settings.get("theme"))
            .and_then(Value::as_str)
    }
}

/// Host capability that embeds a third-party widget into a named container.
///
/// Embedding replaces whatever the container previously held.
pub trait WidgetHost {
    fn render_widget(&mut self, container_id: &str, config: &WidgetConfig, script_source: &str);

    /// Embed using the script that belongs to the config's widget kind.
    fn embed(&mut self, container_id: &str, config: &WidgetConfig) {
        self.render_widget(container_id, config, config.kind().script_source());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_storage_round_trip() {
        assert_eq!(ThemeMode::from_storage_value(Some("light-theme")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_storage_value(Some("dark-theme")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_storage_value(None), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().storage_value(), "light-theme");
    }

    #[test]
    fn test_symbol_overview_exposes_symbol() {
        let config = WidgetConfig::symbol_overview("MEXC:ETHUSDT", ThemeMode::Light);
        assert_eq!(config.symbol(), Some("MEXC:ETHUSDT"));
        assert_eq!(config.theme(), Some("light"));
        assert_eq!(config.kind().script_source(), SYMBOL_OVERVIEW_SCRIPT);
    }

    #[test]
    fn test_advanced_chart_defaults() {
        let config = WidgetConfig::advanced_chart("chart-widget", ThemeMode::Dark);
        assert_eq!(config.symbol(), Some(DEFAULT_CHART_SYMBOL));
        assert_eq!(config.settings()["interval"], "4H");
        assert_eq!(config.settings()["container_id"], "chart-widget");
        assert_eq!(config.theme(), Some("dark"));
    }

    struct Recorder(Vec<(String, String)>);

    impl WidgetHost for Recorder {
        fn render_widget(&mut self, container_id: &str, _config: &WidgetConfig, script: &str) {
            self.0.push((container_id.to_string(), script.to_string()));
        }
    }

    #[test]
    fn test_embed_uses_kind_script() {
        let mut host = Recorder(Vec::new());
        host.embed("ticker-widget", &WidgetConfig::single_quote("X", ThemeMode::Dark));
        assert_eq!(host.0, vec![("ticker-widget".to_string(), SINGLE_QUOTE_SCRIPT.to_string())]);
    }
}
