//! CoinGecko endpoint catalogue.
//!
//! Each endpoint knows its path, the cache key its payload is stored under,
//! and the regions that render it. Turning one into a [`FetchRequest`] only
//! needs the API base URL.

use crate::request::{FetchRequest, TargetId};
use url::form_urlencoded::byte_serialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub const TARGET_GLOBAL_STATS: &str = "global-stats";
pub const TARGET_TRENDING_COINS: &str = "coins-list";
pub const TARGET_TRENDING_NFTS: &str = "nfts-list";
pub const TARGET_ASSETS: &str = "asset-list";
pub const TARGET_EXCHANGES: &str = "exchange-list";
pub const TARGET_CATEGORIES: &str = "category-list";
pub const TARGET_COMPANIES: &str = "company-list";
pub const TARGET_COIN_INFO: &str = "coin-info";
pub const TARGET_SEARCH_COINS: &str = "coins-list";
pub const TARGET_SEARCH_EXCHANGES: &str = "exchanges-list";
pub const TARGET_SEARCH_NFTS: &str = "nfts-list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Global,
    Trending,
    Markets,
    Exchanges,
    Categories,
    PublicTreasury,
    Coin(String),
    Search(String),
}

impl Endpoint {
    /// Path and query relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Global => "/global".to_string(),
            Endpoint::Trending => "/search/trending".to_string(),
            Endpoint::Markets => {
                "/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=20&page=1&sparkline=true"
                    .to_string()
            }
            Endpoint::Exchanges => "/exchanges".to_string(),
            Endpoint::Categories => "/coins/categories".to_string(),
            Endpoint::PublicTreasury => "/companies/public_treasury/bitcoin".to_string(),
            Endpoint::Coin(id) => format!("/coins/{}", encode(id)),
            Endpoint::Search(query) => format!("/search?query={}", encode(query)),
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Endpoint::Global => "Global_Data".to_string(),
            Endpoint::Trending => "Trending_data".to_string(),
            Endpoint::Markets => "Crypto_Data".to_string(),
            Endpoint::Exchanges => "Exchanges_Data".to_string(),
            Endpoint::Categories => "Categories_Data".to_string(),
            Endpoint::PublicTreasury => "Companies_Data".to_string(),
            Endpoint::Coin(id) => format!("Coin_{}", id),
            Endpoint::Search(query) => format!("Search_{}", query),
        }
    }

    /// Endpoint whose payloads are cached under `key`.
    pub fn from_cache_key(key: &str) -> Option<Endpoint> {
        let endpoint = match key {
            "Global_Data" => Endpoint::Global,
            "Trending_data" => Endpoint::Trending,
            "Crypto_Data" => Endpoint::Markets,
            "Exchanges_Data" => Endpoint::Exchanges,
            "Categories_Data" => Endpoint::Categories,
            "Companies_Data" => Endpoint::PublicTreasury,
            _ => {
                if let Some(id) = key.strip_prefix("Coin_") {
                    Endpoint::Coin(id.to_string())
                } else if let Some(query) = key.strip_prefix("Search_") {
                    Endpoint::Search(query.to_string())
                } else {
                    return None;
                }
            }
        };
        Some(endpoint)
    }

    pub fn targets(&self) -> Vec<TargetId> {
        let ids: &[&str] = match self {
            Endpoint::Global => &[TARGET_GLOBAL_STATS],
            Endpoint::Trending => &[TARGET_TRENDING_COINS, TARGET_TRENDING_NFTS],
            Endpoint::Markets => &[TARGET_ASSETS],
            Endpoint::Exchanges => &[TARGET_EXCHANGES],
            Endpoint::Categories => &[TARGET_CATEGORIES],
            Endpoint::PublicTreasury => &[TARGET_COMPANIES],
            Endpoint::Coin(_) => &[TARGET_COIN_INFO],
            Endpoint::Search(_) => &[
                TARGET_SEARCH_COINS,
                TARGET_SEARCH_EXCHANGES,
                TARGET_SEARCH_NFTS,
            ],
        };
        ids.iter().map(|id| TargetId::new(*id)).collect()
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    pub fn request(&self, base_url: &str) -> FetchRequest {
        FetchRequest::new(self.url(base_url), self.cache_key(), self.targets())
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
