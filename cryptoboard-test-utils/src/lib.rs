//! Cryptoboard Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Mock transport with scripted replies and call counting
//! - Manually driven clock
//! - Recording region surface and widget host
//! - Proptest generators and payload fixtures

pub use cryptoboard_client::{HttpResponse, Transport, TransportError};
pub use cryptoboard_core::{Clock, FetchOutcome, FetchRequest, Millis, TabId, TargetId};
pub use cryptoboard_storage::{ExpiringCache, KeyValueStore, MemoryStore};

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cryptoboard_client::{Fetcher, RegionSurface};
use cryptoboard_core::{WidgetConfig, WidgetHost};
use serde_json::Value;

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// Scripted reply for one URL.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(HttpResponse),
    Fail(String),
}

/// Transport that answers from a script and counts every call.
///
/// URLs without a scripted reply get the fallback, a 404 by default.
/// Every call suspends once before replying, so joined requests are all
/// in flight before any of them completes.
#[derive(Debug)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, MockReply>>,
    fallback: MockReply,
    calls: Mutex<Vec<String>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_fallback(MockReply::Respond(HttpResponse::new(404, "")))
    }

    pub fn with_fallback(fallback: MockReply) -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
        self.script(url, MockReply::Respond(HttpResponse::new(status, body)));
    }

    pub fn respond_json(&self, url: impl Into<String>, body: &Value) {
        self.respond(url, 200, body.to_string());
    }

    pub fn fail(&self, url: impl Into<String>, reason: impl Into<String>) {
        self.script(url, MockReply::Fail(reason.into()));
    }

    fn script(&self, url: impl Into<String>, reply: MockReply) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(url.into(), reply);
        }
    }

    /// Total number of requests issued.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Number of requests issued for `url`.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .map(|c| c.iter().filter(|u| u.as_str() == url).count())
            .unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        tokio::task::yield_now().await;
        let reply = self
            .routes
            .lock()
            .ok()
            .and_then(|routes| routes.get(url).cloned())
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(reason) => Err(TransportError::Connection(reason)),
        }
    }
}

// ============================================================================
// CLOCK
// ============================================================================

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(now),
        })
    }

    pub fn advance(&self, ms: Millis) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

/// A fetcher over an in-memory cache, a mock transport and a manual clock.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub clock: Arc<ManualClock>,
    pub cache: Arc<ExpiringCache<MemoryStore, Arc<ManualClock>>>,
    pub fetcher: Fetcher<MemoryStore, Arc<ManualClock>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(MockTransport::new())
    }

    pub fn with_transport(transport: MockTransport) -> Self {
        let transport = Arc::new(transport);
        let clock = ManualClock::starting_at(fixtures::EPOCH_MS);
        let cache = Arc::new(ExpiringCache::new(MemoryStore::new(), clock.clone()));
        let fetcher = Fetcher::new(transport.clone(), cache.clone());
        Self {
            transport,
            clock,
            cache,
            fetcher,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RECORDING SURFACES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    ShowLoading(String),
    HideLoading(String),
    ShowError(String),
    HideError(String),
}

/// Region surface that records every toggle in order.
///
/// All regions exist unless marked missing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    missing: BTreeSet<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            calls: Vec::new(),
            missing: ids.into_iter().map(Into::into).collect(),
        }
    }

    fn record(&mut self, call: SurfaceCall, id: &TargetId) -> bool {
        self.calls.push(call);
        !self.missing.contains(id.as_str())
    }

    /// Whether `id`'s loading indicator is currently shown.
    pub fn is_loading(&self, id: &str) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                SurfaceCall::ShowLoading(c) if c == id => Some(true),
                SurfaceCall::HideLoading(c) if c == id => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Whether `id`'s error indicator is currently shown.
    pub fn has_error(&self, id: &str) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                SurfaceCall::ShowError(c) if c == id => Some(true),
                SurfaceCall::HideError(c) if c == id => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl RegionSurface for RecordingSurface {
    fn show_loading(&mut self, id: &TargetId) -> bool {
        self.record(SurfaceCall::ShowLoading(id.to_string()), id)
    }

    fn hide_loading(&mut self, id: &TargetId) -> bool {
        self.record(SurfaceCall::HideLoading(id.to_string()), id)
    }

    fn show_error(&mut self, id: &TargetId) -> bool {
        self.record(SurfaceCall::ShowError(id.to_string()), id)
    }

    fn hide_error(&mut self, id: &TargetId) -> bool {
        self.record(SurfaceCall::HideError(id.to_string()), id)
    }
}

/// Widget host that records every embed.
#[derive(Debug, Default)]
pub struct RecordingWidgetHost {
    pub embeds: Vec<(String, WidgetConfig, String)>,
}

impl WidgetHost for RecordingWidgetHost {
    fn render_widget(&mut self, container_id: &str, config: &WidgetConfig, script_source: &str) {
        self.embeds
            .push((container_id.to_string(), config.clone(), script_source.to_string()));
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_cache_key() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Global_Data".to_string()),
            Just("Trending_data".to_string()),
            Just("Crypto_Data".to_string()),
            Just("Exchanges_Data".to_string()),
            "Coin_[a-z-]{1,16}",
            "Search_[a-z0-9]{1,12}",
        ]
    }

    pub fn arb_target_id() -> impl Strategy<Value = TargetId> {
        "[a-z]{3,10}-list".prop_map(TargetId::new)
    }

    pub fn arb_fetch_request() -> impl Strategy<Value = FetchRequest> {
        (
            "[a-z/]{1,24}",
            arb_cache_key(),
            prop::collection::btree_set(arb_target_id(), 1..4),
        )
            .prop_map(|(path, key, targets)| {
                FetchRequest::new(format!("{}/{}", fixtures::BASE_URL, path), key, targets)
            })
    }

    /// JSON payloads without floats, so equality is exact.
    pub fn arb_payload() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<f64>()
                .prop_filter("finite", |f| f.is_finite())
                .prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Any status outside the 2xx range.
    pub fn arb_failure_status() -> impl Strategy<Value = u16> {
        prop_oneof![100u16..200, 300u16..600]
    }

    pub fn arb_home_tab() -> impl Strategy<Value = TabId> {
        prop_oneof![
            Just(TabId::new("tab1")),
            Just(TabId::new("tab2")),
            Just(TabId::new("tab3")),
            Just(TabId::new("tab4")),
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use serde_json::{json, Value};

    pub const BASE_URL: &str = "https://api.test/api/v3";

    /// 2023-11-14T22:13:20Z
    pub const EPOCH_MS: i64 = 1_700_000_000_000;

    /// `count` coins as returned by `/coins/markets`. Even-indexed coins
    /// trend up over seven days, odd-indexed ones down.
    pub fn market_coins(count: usize) -> Value {
        let coins: Vec<Value> = (0..count)
            .map(|i| {
                let price = 1000.0 / (i as f64 + 1.0);
                let rising = i % 2 == 0;
                let sparkline = if rising {
                    vec![price * 0.9, price * 0.95, price]
                } else {
                    vec![price * 1.1, price * 1.05, price]
                };
                let change = if rising { 1.5 } else { -1.5 };
                json!({
                    "id": format!("coin-{}", i),
                    "symbol": format!("c{}", i),
                    "name": format!("Coin {}", i),
                    "image": format!("https://img.test/coin-{}.png", i),
                    "current_price": price,
                    "market_cap": price * 1.0e9,
                    "market_cap_rank": i + 1,
                    "total_volume": price * 1.0e7,
                    "price_change_24h": change,
                    "price_change_percentage_24h": change * 2.0,
                    "sparkline_in_7d": { "price": sparkline },
                })
            })
            .collect();
        Value::Array(coins)
    }

    pub fn global() -> Value {
        json!({
            "data": {
                "active_cryptocurrencies": 14_000,
                "markets": 1_100,
                "total_market_cap": { "usd": 2_345_000_000_000.0 },
                "total_volume": { "usd": 87_654_321_000.0 },
                "market_cap_percentage": { "btc": 52.1234, "eth": 16.5 },
                "market_cap_change_percentage_24h_usd": -1.234,
            }
        })
    }

    pub fn trending(coins: usize, nfts: usize) -> Value {
        let coins: Vec<Value> = (0..coins)
            .map(|i| {
                let change = if i % 2 == 0 { 3.2 } else { -4.1 };
                json!({
                    "item": {
                        "id": format!("trend-{}", i),
                        "name": format!("Trend {}", i),
                        "symbol": format!("T{}", i),
                        "thumb": "https://img.test/t.png",
                        "price_btc": 0.00001 * (i as f64 + 1.0),
                        "data": {
                            "market_cap": "$1,234,567",
                            "total_volume": "$89,012",
                            "price_change_percentage_24h": { "usd": change },
                        }
                    }
                })
            })
            .collect();
        let nfts: Vec<Value> = (0..nfts)
            .map(|i| {
                json!({
                    "id": format!("nft-{}", i),
                    "name": format!("Nft {}", i),
                    "symbol": format!("N{}", i),
                    "thumb": "https://img.test/n.png",
                    "native_currency_symbol": "eth",
                    "data": {
                        "floor_price": "1.5 ETH",
                        "h24_volume": "20 ETH",
                        "floor_price_in_usd_24h_percentage_change": "-2.3",
                    }
                })
            })
            .collect();
        json!({ "coins": coins, "nfts": nfts })
    }

    pub fn exchanges(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| {
                    json!({
                        "id": format!("ex-{}", i),
                        "name": format!("Exchange {}", i),
                        "image": "https://img.test/e.png",
                        "trust_score": 10 - (i % 10),
                        "trust_score_rank": i + 1,
                        "trade_volume_24h_btc": 1000.0 + i as f64,
                        "trade_volume_24h_btc_normalized": 900.0 + i as f64,
                        "country": "Cayman Islands",
                        "url": "https://ex.test",
                        "year_established": 2017,
                    })
                })
                .collect(),
        )
    }

    pub fn categories(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| {
                    let change = if i % 2 == 0 { 1.0 } else { -1.0 };
                    json!({
                        "id": format!("cat-{}", i),
                        "name": format!("Category {}", i),
                        "market_cap": 1.0e10 * (i as f64 + 1.0),
                        "market_cap_change_24h": change,
                        "volume_24h": 1.0e8,
                        "top_3_coins": ["https://img.test/a.png"],
                    })
                })
                .collect(),
        )
    }

    pub fn companies(count: usize) -> Value {
        let companies: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "name": format!("Company {}", i),
                    "symbol": format!("CO{}", i),
                    "country": "US",
                    "total_holdings": 1000.0 * (i as f64 + 1.0),
                    "total_entry_value_usd": 3.0e7,
                    "total_current_value_usd": 6.0e7,
                    "percentage_of_total_supply": 0.05,
                })
            })
            .collect();
        json!({ "companies": companies })
    }

    pub fn coin_detail(id: &str, symbol: &str) -> Value {
        json!({
            "id": id,
            "symbol": symbol,
            "name": "Bitcoin",
            "market_cap_rank": 1,
            "image": {
                "thumb": "https://img.test/btc-thumb.png",
                "small": "https://img.test/btc-small.png",
                "large": "https://img.test/btc-large.png",
            },
            "market_data": {
                "current_price": { "usd": 64_000.5 },
                "market_cap": { "usd": 1.26e12 },
                "ath": { "usd": 73_738.0 },
                "atl": { "usd": 67.81 },
                "total_volume": { "usd": 3.1e10 },
                "high_24h": { "usd": 65_000.0 },
                "low_24h": { "usd": 63_000.0 },
                "total_supply": 21_000_000.0,
                "max_supply": 21_000_000.0,
                "circulating_supply": 19_700_000.0,
            },
            "tickers": [
                { "market": { "name": "Binance" }, "trade_url": "https://b.test", "trust_score": "green" },
                { "market": { "name": "Coinbase" }, "trade_url": null, "trust_score": "green" },
                { "market": { "name": "Kraken" }, "trade_url": "https://k.test", "trust_score": "green" },
                { "market": { "name": "MEXC" }, "trade_url": "https://m.test", "trust_score": "yellow" },
            ],
            "links": {
                "homepage": ["https://bitcoin.org", ""],
                "whitepaper": "https://bitcoin.org/bitcoin.pdf",
                "twitter_screen_name": "bitcoin",
                "facebook_username": "bitcoins",
            },
            "description": { "en": "Bitcoin is the first decentralized cryptocurrency." },
        })
    }

    pub fn search_results() -> Value {
        json!({
            "coins": [
                { "id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "market_cap_rank": 1, "thumb": "https://img.test/btc.png" },
                { "id": "bitcoin-cash", "name": "Bitcoin Cash", "symbol": "BCH", "market_cap_rank": 20, "thumb": "https://img.test/bch.png" },
                { "id": "obscure", "name": "Obscure", "symbol": "OBS", "market_cap_rank": null, "thumb": "missing_thumb.png" },
            ],
            "exchanges": [
                { "id": "bitget", "name": "Bitget", "market_type": "spot", "thumb": "https://img.test/bg.png" },
                { "id": "bitmart", "name": "BitMart", "market_type": "spot", "thumb": "https://img.test/bm.png" },
            ],
            "nfts": [
                { "id": "bitcoin-frogs", "name": "Bitcoin Frogs", "symbol": "FROG", "thumb": "https://img.test/f.png" },
            ],
        })
    }
}
