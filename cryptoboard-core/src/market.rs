//! CoinGecko payload models.
//!
//! Only the fields the dashboard renders are modelled. Numeric fields the API
//! sometimes omits or nulls are `Option`; fields the API sends either as a
//! string or a number are kept as raw [`Value`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Direction of a price move, used for green/red colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
}

impl PriceDirection {
    /// Zero counts as up.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            PriceDirection::Up
        } else {
            PriceDirection::Down
        }
    }
}

/// Look up the USD entry of a per-currency map.
pub fn usd(map: &HashMap<String, Option<f64>>) -> Option<f64> {
    map.get("usd").copied().flatten()
}

/// Read a value that may be a JSON number or a numeric string.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Render a string-or-number value as display text.
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// GLOBAL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalData {
    pub active_cryptocurrencies: Option<u64>,
    pub markets: Option<u64>,
    #[serde(default)]
    pub total_market_cap: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub total_volume: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, Option<f64>>,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
}

impl GlobalData {
    pub fn dominance(&self, symbol: &str) -> Option<f64> {
        self.market_cap_percentage.get(symbol).copied().flatten()
    }
}

// ============================================================================
// TRENDING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingCoinEntry>,
    #[serde(default)]
    pub nfts: Vec<TrendingNft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoinEntry {
    pub item: TrendingCoin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub price_btc: Value,
    #[serde(default)]
    pub data: TrendingCoinData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingCoinData {
    #[serde(default)]
    pub market_cap: Value,
    #[serde(default)]
    pub total_volume: Value,
    #[serde(default)]
    pub price_change_percentage_24h: HashMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingNft {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub native_currency_symbol: String,
    #[serde(default)]
    pub data: TrendingNftData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingNftData {
    #[serde(default)]
    pub floor_price: Value,
    #[serde(default)]
    pub h24_volume: Value,
    #[serde(default)]
    pub floor_price_in_usd_24h_percentage_change: Value,
}

// ============================================================================
// MARKETS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub sparkline_in_7d: Option<SparklineData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparklineData {
    #[serde(default)]
    pub price: Vec<f64>,
}

impl MarketCoin {
    pub fn sparkline(&self) -> &[f64] {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }

    /// Up when the last seven-day price is at least the first one.
    pub fn sparkline_direction(&self) -> PriceDirection {
        match (self.sparkline().first(), self.sparkline().last()) {
            (Some(first), Some(last)) if first > last => PriceDirection::Down,
            _ => PriceDirection::Up,
        }
    }
}

// ============================================================================
// EXCHANGES / CATEGORIES / COMPANIES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub trust_score: Option<u32>,
    pub trust_score_rank: Option<u32>,
    pub trade_volume_24h_btc: Option<f64>,
    pub trade_volume_24h_btc_normalized: Option<f64>,
    pub country: Option<String>,
    pub url: Option<String>,
    pub year_established: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub market_cap: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub top_3_coins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryResponse {
    #[serde(default)]
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub symbol: Option<String>,
    pub country: Option<String>,
    pub total_holdings: Option<f64>,
    pub total_entry_value_usd: Option<f64>,
    pub total_current_value_usd: Option<f64>,
    pub percentage_of_total_supply: Option<f64>,
}

// ============================================================================
// COIN DETAIL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub image: CoinImage,
    #[serde(default)]
    pub market_data: CoinMarketData,
    #[serde(default)]
    pub tickers: Vec<Ticker>,
    #[serde(default)]
    pub links: CoinLinks,
    #[serde(default)]
    pub description: HashMap<String, String>,
}

impl CoinDetail {
    /// English description, or `None` when the API sends an empty one.
    pub fn description_en(&self) -> Option<&str> {
        self.description
            .get("en")
            .map(String::as_str)
            .filter(|d| !d.trim().is_empty())
    }

    /// Ticker symbol used by the embedded quote and chart widgets.
    pub fn widget_symbol(&self) -> String {
        format!("MEXC:{}USDT", self.symbol.to_uppercase())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub market_cap: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub ath: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub atl: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub total_volume: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub high_24h: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub low_24h: HashMap<String, Option<f64>>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub circulating_supply: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub market: TickerMarket,
    pub trade_url: Option<String>,
    pub trust_score: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerMarket {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    pub whitepaper: Option<String>,
    pub twitter_screen_name: Option<String>,
    pub facebook_username: Option<String>,
}

impl CoinLinks {
    pub fn first_homepage(&self) -> Option<&str> {
        self.homepage
            .iter()
            .map(String::as_str)
            .find(|h| !h.trim().is_empty())
    }
}

// ============================================================================
// SEARCH
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
    #[serde(default)]
    pub exchanges: Vec<SearchExchange>,
    #[serde(default)]
    pub nfts: Vec<SearchNft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchExchange {
    pub id: String,
    pub name: String,
    pub market_type: Option<String>,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchNft {
    pub id: String,
    pub name: String,
    pub symbol: Option<String>,
    #[serde(default)]
    pub thumb: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparkline_direction() {
        let mut coin: MarketCoin = serde_json::from_value(json!({
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "sparkline_in_7d": { "price": [1.0, 3.0, 2.0] }
        }))
        .unwrap();
        assert_eq!(coin.sparkline_direction(), PriceDirection::Up);

        coin.sparkline_in_7d = Some(SparklineData {
            price: vec![5.0, 4.0],
        });
        assert_eq!(coin.sparkline_direction(), PriceDirection::Down);

        coin.sparkline_in_7d = None;
        assert_eq!(coin.sparkline_direction(), PriceDirection::Up);
    }

    #[test]
    fn test_value_helpers_accept_strings_and_numbers() {
        assert_eq!(value_as_f64(&json!("-1.25")), Some(-1.25));
        assert_eq!(value_as_f64(&json!("$1,234.5")), Some(1234.5));
        assert_eq!(value_as_f64(&json!(3)), Some(3.0));
        assert_eq!(value_as_f64(&json!(null)), None);
        assert_eq!(value_as_text(&json!("$12 B")), "$12 B");
        assert_eq!(value_as_text(&json!(null)), "N/A");
    }

    #[test]
    fn test_coin_detail_tolerates_null_prices() {
        let coin: CoinDetail = serde_json::from_value(json!({
            "id": "foo", "symbol": "foo", "name": "Foo",
            "market_data": { "current_price": { "usd": null }, "max_supply": null },
            "description": { "en": "" }
        }))
        .unwrap();
        assert_eq!(usd(&coin.market_data.current_price), None);
        assert!(coin.description_en().is_none());
        assert_eq!(coin.widget_symbol(), "MEXC:FOOUSDT");
    }

    #[test]
    fn test_global_dominance_lookup() {
        let global: GlobalResponse = serde_json::from_value(json!({
            "data": { "market_cap_percentage": { "btc": 52.1, "eth": 17.0 } }
        }))
        .unwrap();
        assert_eq!(global.data.dominance("btc"), Some(52.1));
        assert_eq!(global.data.dominance("sol"), None);
    }
}
