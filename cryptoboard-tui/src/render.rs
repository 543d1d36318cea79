//! Render routines: turn fetched payloads into display rows.
//!
//! Each payload is routed by the cache key it was fetched under. A routine
//! either fills its slice of [`ViewData`] or rejects the payload shape with a
//! [`RenderError`], which the dispatcher reports like a failed fetch.

use cryptoboard_client::RenderError;
use cryptoboard_core::format::{self, NOT_AVAILABLE};
use cryptoboard_core::market::{
    self, value_as_f64, value_as_text, CoinDetail, Company, GlobalData, GlobalResponse, MarketCoin,
    PriceDirection, SearchResponse, TreasuryResponse, TrendingResponse,
};
use cryptoboard_core::search::balance_results;
use cryptoboard_core::{Endpoint, ThemeMode, WidgetConfig, WidgetHost};
use serde_json::Value;

pub const TICKER_CONTAINER: &str = "ticker-widget";
pub const MINI_CHART_CONTAINER: &str = "mini-chart-widget";
pub const CHART_CONTAINER: &str = "chart-widget";

pub const TRENDING_LIMIT: usize = 5;
pub const TABLE_LIMIT: usize = 20;
pub const COIN_MARKETS_LIMIT: usize = 3;

pub const DESCRIPTION_FALLBACK: &str = "Asset description not available!";
pub const NO_QUERY_HEADING: &str = "Please search something...";
pub const NO_QUERY_BODY: &str = "Nothing To Show...";

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStats {
    pub coins: String,
    pub exchanges: String,
    pub market_cap: String,
    pub market_cap_change: Option<f64>,
    pub volume: String,
    pub dominance: String,
}

impl GlobalStats {
    /// Every field `N/A`; shown when the global request fails.
    pub fn unavailable() -> Self {
        Self::from_data(&GlobalData::default())
    }

    pub fn from_data(data: &GlobalData) -> Self {
        let dominance = |symbol: &str| format::percent_or_na(data.dominance(symbol), 1);
        Self {
            coins: count_or_na(data.active_cryptocurrencies),
            exchanges: count_or_na(data.markets),
            market_cap: market::usd(&data.total_market_cap)
                .map(format::trillions)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            market_cap_change: data.market_cap_change_percentage_24h_usd,
            volume: market::usd(&data.total_volume)
                .map(format::billions)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            dominance: format!("BTC {} - ETH {}", dominance("btc"), dominance("eth")),
        }
    }

    pub fn market_cap_change_text(&self) -> String {
        format::percent_or_na(self.market_cap_change, 1)
    }
}

fn count_or_na(count: Option<u64>) -> String {
    count
        .filter(|c| *c > 0)
        .map(|c| c.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingCoinRow {
    pub id: String,
    pub name: String,
    pub price_btc: String,
    pub market_cap: String,
    pub volume: String,
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingNftRow {
    pub name: String,
    pub market: String,
    pub floor_price: String,
    pub volume: String,
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRow {
    pub id: String,
    pub rank: String,
    pub name: String,
    pub price: String,
    pub price_change: String,
    pub change_pct: Option<f64>,
    pub volume: String,
    pub market_cap: String,
    pub sparkline: Vec<f64>,
    pub sparkline_direction: PriceDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRow {
    pub rank: String,
    pub name: String,
    pub trust_score: String,
    pub volume_btc: String,
    pub volume_btc_normalized: String,
    pub country: String,
    pub website: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub name: String,
    pub top_coins: usize,
    pub market_cap: String,
    pub change: Option<f64>,
    pub change_text: String,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRow {
    pub name: String,
    pub holdings: String,
    pub entry_value: String,
    pub current_value: String,
    pub supply_share: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketLink {
    pub name: String,
    pub trade_url: String,
    pub trust_score: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoinView {
    pub id: String,
    pub title: String,
    pub rank: String,
    pub overview: Vec<(&'static str, String)>,
    pub historical: Vec<(&'static str, String)>,
    pub markets: Vec<MarketLink>,
    pub links: Vec<(&'static str, String)>,
    pub description: String,
    pub widget_symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRow {
    pub id: String,
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub coins: Vec<SearchRow>,
    pub exchanges: Vec<SearchRow>,
    pub nfts: Vec<SearchRow>,
}

impl SearchView {
    pub fn empty_message(category: &str) -> String {
        format!("No results found for {}.", category)
    }

    pub fn heading(query: &str) -> String {
        format!("Search results for \"{}\"", query)
    }
}

/// Everything the current page has rendered so far.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    pub global: Option<GlobalStats>,
    pub trending_coins: Vec<TrendingCoinRow>,
    pub trending_nfts: Vec<TrendingNftRow>,
    pub assets: Vec<AssetRow>,
    pub exchanges: Vec<ExchangeRow>,
    pub categories: Vec<CategoryRow>,
    pub companies: Vec<CompanyRow>,
    pub coin: Option<CoinView>,
    pub search: Option<SearchView>,
}

/// Writes rendered payloads into [`ViewData`] and embeds coin widgets.
pub struct Renderer<'a, H: WidgetHost + ?Sized> {
    views: &'a mut ViewData,
    host: &'a mut H,
    theme: ThemeMode,
}

impl<'a, H: WidgetHost + ?Sized> Renderer<'a, H> {
    pub fn new(views: &'a mut ViewData, host: &'a mut H, theme: ThemeMode) -> Self {
        Self { views, host, theme }
    }

    pub fn render(&mut self, cache_key: &str, data: Value) -> Result<(), RenderError> {
        let endpoint = Endpoint::from_cache_key(cache_key)
            .ok_or_else(|| RenderError::Shape(format!("no render routine for {}", cache_key)))?;

        match endpoint {
            Endpoint::Global => {
                let response: GlobalResponse = serde_json::from_value(data)?;
                self.views.global = Some(GlobalStats::from_data(&response.data));
            }
            Endpoint::Trending => {
                let response: TrendingResponse = serde_json::from_value(data)?;
                let (coins, nfts) = trending_rows(response);
                self.views.trending_coins = coins;
                self.views.trending_nfts = nfts;
            }
            Endpoint::Markets => {
                let coins: Vec<MarketCoin> = serde_json::from_value(data)?;
                self.views.assets = coins.iter().map(asset_row).collect();
            }
            Endpoint::Exchanges => {
                let mut exchanges: Vec<market::Exchange> = serde_json::from_value(data)?;
                exchanges.truncate(TABLE_LIMIT);
                self.views.exchanges = exchanges.iter().map(exchange_row).collect();
            }
            Endpoint::Categories => {
                let mut categories: Vec<market::Category> = serde_json::from_value(data)?;
                categories.truncate(TABLE_LIMIT);
                self.views.categories = categories.iter().map(category_row).collect();
            }
            Endpoint::PublicTreasury => {
                let response: TreasuryResponse = serde_json::from_value(data)?;
                self.views.companies = response.companies.iter().map(company_row).collect();
            }
            Endpoint::Coin(_) => {
                let detail: CoinDetail = serde_json::from_value(data)?;
                let view = coin_view(&detail);
                self.embed_coin_widgets(&view.widget_symbol);
                self.views.coin = Some(view);
            }
            Endpoint::Search(_) => {
                let response: SearchResponse = serde_json::from_value(data)?;
                self.views.search = Some(search_view(balance_results(response)));
            }
        }
        Ok(())
    }

    fn embed_coin_widgets(&mut self, symbol: &str) {
        self.host
            .embed(TICKER_CONTAINER, &WidgetConfig::single_quote(symbol, self.theme));
        self.host
            .embed(MINI_CHART_CONTAINER, &WidgetConfig::symbol_overview(symbol, self.theme));
    }
}

fn dollars(value: &Value) -> String {
    let text = value_as_text(value);
    if text == NOT_AVAILABLE || text.starts_with('$') {
        text
    } else {
        format!("${}", text)
    }
}

fn trending_rows(response: TrendingResponse) -> (Vec<TrendingCoinRow>, Vec<TrendingNftRow>) {
    let coins = response
        .coins
        .into_iter()
        .take(TRENDING_LIMIT)
        .map(|entry| {
            let coin = entry.item;
            TrendingCoinRow {
                name: format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
                price_btc: value_as_f64(&coin.price_btc)
                    .map(|p| format::fixed(p, 6))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                market_cap: dollars(&coin.data.market_cap),
                volume: dollars(&coin.data.total_volume),
                change: market::usd(&coin.data.price_change_percentage_24h),
                id: coin.id,
            }
        })
        .collect();

    let nfts = response
        .nfts
        .into_iter()
        .take(TRENDING_LIMIT)
        .map(|nft| TrendingNftRow {
            name: format!("{} ({})", nft.name, nft.symbol.to_uppercase()),
            market: nft.native_currency_symbol.to_uppercase(),
            floor_price: dollars(&nft.data.floor_price),
            volume: dollars(&nft.data.h24_volume),
            change: value_as_f64(&nft.data.floor_price_in_usd_24h_percentage_change),
        })
        .collect();

    (coins, nfts)
}

fn asset_row(coin: &MarketCoin) -> AssetRow {
    let dollars_fixed = |v: Option<f64>| {
        v.map(|v| format!("${}", format::fixed(v, 2)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let dollars_compact = |v: Option<f64>| {
        v.map(|v| format!("${}", format::compact(v)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    AssetRow {
        id: coin.id.clone(),
        rank: coin
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        name: format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
        price: dollars_fixed(coin.current_price),
        price_change: dollars_fixed(coin.price_change_24h),
        change_pct: coin.price_change_percentage_24h,
        volume: dollars_compact(coin.total_volume),
        market_cap: dollars_compact(coin.market_cap),
        sparkline: coin.sparkline().to_vec(),
        sparkline_direction: coin.sparkline_direction(),
    }
}

fn exchange_row(exchange: &market::Exchange) -> ExchangeRow {
    let btc = |v: Option<f64>| {
        v.map(|v| format!("{} BTC", format::grouped(v, 3)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    ExchangeRow {
        rank: or_na(exchange.trust_score_rank.map(|r| r.to_string())),
        name: exchange.name.clone(),
        trust_score: or_na(exchange.trust_score.map(|s| s.to_string())),
        volume_btc: btc(exchange.trade_volume_24h_btc),
        volume_btc_normalized: btc(exchange.trade_volume_24h_btc_normalized),
        country: or_na(exchange.country.clone().filter(|c| !c.is_empty())),
        website: or_na(exchange.url.clone()),
        year: or_na(exchange.year_established.map(|y| y.to_string())),
    }
}

fn category_row(category: &market::Category) -> CategoryRow {
    let change = category.market_cap_change_24h;
    CategoryRow {
        name: category.name.clone(),
        top_coins: category.top_3_coins.len(),
        market_cap: format::usd_or_na(category.market_cap),
        change,
        change_text: match change {
            Some(c) if c != 0.0 => format::percent(c, 3),
            _ => "0%".to_string(),
        },
        volume: format::usd_or_na(category.volume_24h),
    }
}

fn company_row(company: &Company) -> CompanyRow {
    CompanyRow {
        name: company.name.clone(),
        holdings: company
            .total_holdings
            .map(format::compact)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        entry_value: format::usd_or_na(company.total_entry_value_usd),
        current_value: format::usd_or_na(company.total_current_value_usd),
        supply_share: format::percent_or_na(company.percentage_of_total_supply, 3),
    }
}

fn coin_view(coin: &CoinDetail) -> CoinView {
    let data = &coin.market_data;
    let overview = vec![
        ("Market Cap", format::usd_or_na(market::usd(&data.market_cap))),
        ("Current Price", format::usd_or_na(market::usd(&data.current_price))),
        ("All Time High", format::usd_or_na(market::usd(&data.ath))),
        ("All Time Low", format::usd_or_na(market::usd(&data.atl))),
        ("Total Volume", format::usd_or_na(market::usd(&data.total_volume))),
        ("Total Supply", format::amount_or_na(data.total_supply)),
        ("Max Supply", format::amount_or_na(data.max_supply)),
        ("Circulating Supply", format::amount_or_na(data.circulating_supply)),
    ];
    let historical = vec![
        ("ATH", format::usd_or_na(market::usd(&data.ath))),
        ("ATL", format::usd_or_na(market::usd(&data.atl))),
        ("24h High", format::usd_or_na(market::usd(&data.high_24h))),
        ("24h Low", format::usd_or_na(market::usd(&data.low_24h))),
    ];
    let markets = coin
        .tickers
        .iter()
        .take(COIN_MARKETS_LIMIT)
        .map(|ticker| MarketLink {
            name: ticker.market.name.replace("Exchange", "").trim().to_string(),
            trade_url: ticker
                .trade_url
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            trust_score: ticker
                .trust_score
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect();
    let link = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let links = vec![
        ("Website", link(coin.links.first_homepage().map(str::to_string))),
        ("Whitepaper", link(coin.links.whitepaper.clone().filter(|w| !w.is_empty()))),
        (
            "Twitter",
            link(coin.links.twitter_screen_name.as_ref().map(|n| format!("https://x.com/{}", n))),
        ),
        (
            "Facebook",
            link(coin.links.facebook_username.as_ref().map(|n| format!("https://facebook.com/{}", n))),
        ),
    ];

    CoinView {
        id: coin.id.clone(),
        title: format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
        rank: coin
            .market_cap_rank
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        overview,
        historical,
        markets,
        links,
        description: coin
            .description_en()
            .map(strip_tags)
            .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string()),
        widget_symbol: coin.widget_symbol(),
    }
}

/// Descriptions arrive with inline HTML anchors; keep only the text.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn search_view(results: SearchResponse) -> SearchView {
    SearchView {
        coins: results
            .coins
            .into_iter()
            .map(|coin| SearchRow {
                label: format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
                detail: coin
                    .market_cap_rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                id: coin.id,
            })
            .collect(),
        exchanges: results
            .exchanges
            .into_iter()
            .map(|ex| SearchRow {
                label: ex.name,
                detail: ex.market_type.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                id: ex.id,
            })
            .collect(),
        nfts: results
            .nfts
            .into_iter()
            .map(|nft| SearchRow {
                label: nft.name,
                detail: nft.symbol.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                id: nft.id,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoboard_core::WidgetKind;
    use cryptoboard_test_utils::fixtures;
    use cryptoboard_test_utils::RecordingWidgetHost;
    use serde_json::json;

    fn render(key: &str, data: Value) -> (Result<(), RenderError>, ViewData, RecordingWidgetHost) {
        let mut views = ViewData::default();
        let mut host = RecordingWidgetHost::default();
        let result = Renderer::new(&mut views, &mut host, ThemeMode::Dark).render(key, data);
        (result, views, host)
    }

    #[test]
    fn test_global_stats_formatting() {
        let (result, views, _) = render("Global_Data", fixtures::global());
        result.unwrap();
        let stats = views.global.expect("stats");
        assert_eq!(stats.coins, "14000");
        assert_eq!(stats.market_cap, "$2.345T");
        assert_eq!(stats.volume, "$87.654B");
        assert_eq!(stats.market_cap_change_text(), "-1.2%");
        assert_eq!(stats.dominance, "BTC 52.1% - ETH 16.5%");
    }

    #[test]
    fn test_unavailable_global_stats() {
        let stats = GlobalStats::unavailable();
        assert_eq!(stats.market_cap, "N/A");
        assert_eq!(stats.market_cap_change_text(), "N/A");
        assert_eq!(stats.dominance, "BTC N/A - ETH N/A");
    }

    #[test]
    fn test_trending_keeps_top_five() {
        let (result, views, _) = render("Trending_data", fixtures::trending(7, 6));
        result.unwrap();
        assert_eq!(views.trending_coins.len(), 5);
        assert_eq!(views.trending_nfts.len(), 5);
        assert_eq!(views.trending_coins[0].price_btc, "0.000010");
        assert_eq!(views.trending_coins[0].market_cap, "$1,234,567");
        assert_eq!(views.trending_nfts[0].market, "ETH");
    }

    #[test]
    fn test_tables_are_capped_at_twenty() {
        let (_, views, _) = render("Exchanges_Data", fixtures::exchanges(25));
        assert_eq!(views.exchanges.len(), 20);
        assert_eq!(views.exchanges[0].volume_btc, "1,000.000 BTC");

        let (_, views, _) = render("Categories_Data", fixtures::categories(30));
        assert_eq!(views.categories.len(), 20);
        assert_eq!(views.categories[1].change_text, "-1.000%");
    }

    #[test]
    fn test_asset_rows() {
        let (result, views, _) = render("Crypto_Data", fixtures::market_coins(2));
        result.unwrap();
        assert_eq!(views.assets[0].price, "$1000.00");
        assert_eq!(views.assets[0].sparkline_direction, PriceDirection::Up);
        assert_eq!(views.assets[1].sparkline_direction, PriceDirection::Down);
    }

    #[test]
    fn test_coin_page_embeds_both_widgets() {
        let (result, views, host) = render("Coin_bitcoin", fixtures::coin_detail("bitcoin", "btc"));
        result.unwrap();

        let coin = views.coin.expect("coin view");
        assert_eq!(coin.widget_symbol, "MEXC:BTCUSDT");
        assert_eq!(coin.markets.len(), 3);
        assert_eq!(coin.markets[1].trade_url, "N/A");
        assert_eq!(coin.historical[3], ("24h Low", "$63,000.000".to_string()));

        let containers: Vec<&str> = host.embeds.iter().map(|(c, _, _)| c.as_str()).collect();
        assert_eq!(containers, vec![TICKER_CONTAINER, MINI_CHART_CONTAINER]);
        assert_eq!(host.embeds[1].1.kind(), WidgetKind::SymbolOverview);
        assert_eq!(host.embeds[1].1.symbol(), Some("MEXC:BTCUSDT"));
    }

    #[test]
    fn test_missing_description_uses_fallback() {
        let mut detail = fixtures::coin_detail("bitcoin", "btc");
        detail["description"] = json!({ "en": "" });
        let (_, views, _) = render("Coin_bitcoin", detail);
        assert_eq!(views.coin.expect("coin").description, DESCRIPTION_FALLBACK);
    }

    #[test]
    fn test_description_html_is_stripped() {
        assert_eq!(strip_tags("See <a href=\"x\">the site</a>."), "See the site.");
    }

    #[test]
    fn test_search_results_are_balanced() {
        let (result, views, _) = render("Search_bit", fixtures::search_results());
        result.unwrap();
        let search = views.search.expect("search view");
        assert_eq!(search.coins.len(), 1);
        assert_eq!(search.exchanges.len(), 1);
        assert_eq!(search.nfts.len(), 1);
        assert_eq!(SearchView::heading("bit"), "Search results for \"bit\"");
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let (result, views, host) = render("Crypto_Data", json!({ "unexpected": true }));
        assert!(matches!(result, Err(RenderError::Shape(_))));
        assert!(views.assets.is_empty());
        assert!(host.embeds.is_empty());

        let (result, _, _) = render("Unknown_Key", json!([]));
        assert!(result.is_err());
    }
}
