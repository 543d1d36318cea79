//! Post-processing of search results before display.

use crate::market::SearchResponse;

/// Placeholder thumbnail CoinGecko returns for entries without artwork.
pub const MISSING_THUMB: &str = "missing_thumb.png";

/// Drop entries without a thumbnail, then, if every category still has
/// results, truncate all three to the size of the smallest one.
pub fn balance_results(mut results: SearchResponse) -> SearchResponse {
    results.coins.retain(|c| c.thumb != MISSING_THUMB);
    results.exchanges.retain(|e| e.thumb != MISSING_THUMB);
    results.nfts.retain(|n| n.thumb != MISSING_THUMB);

    let counts = [
        results.coins.len(),
        results.exchanges.len(),
        results.nfts.len(),
    ];
    if counts.iter().all(|c| *c > 0) {
        let min = counts.iter().copied().min().unwrap_or(0);
        results.coins.truncate(min);
        results.exchanges.truncate(min);
        results.nfts.truncate(min);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{SearchCoin, SearchExchange, SearchNft};

    fn coin(id: &str, thumb: &str) -> SearchCoin {
        SearchCoin {
            id: id.into(),
            name: id.into(),
            symbol: id.into(),
            market_cap_rank: None,
            thumb: thumb.into(),
        }
    }

    fn exchange(id: &str) -> SearchExchange {
        SearchExchange {
            id: id.into(),
            name: id.into(),
            market_type: Some("spot".into()),
            thumb: "x.png".into(),
        }
    }

    fn nft(id: &str) -> SearchNft {
        SearchNft {
            id: id.into(),
            name: id.into(),
            symbol: None,
            thumb: "x.png".into(),
        }
    }

    #[test]
    fn test_missing_thumbnails_are_dropped() {
        let results = SearchResponse {
            coins: vec![coin("a", MISSING_THUMB), coin("b", "b.png")],
            exchanges: vec![],
            nfts: vec![],
        };
        let balanced = balance_results(results);
        assert_eq!(balanced.coins.len(), 1);
        assert_eq!(balanced.coins[0].id, "b");
    }

    #[test]
    fn test_truncates_to_smallest_when_all_present() {
        let results = SearchResponse {
            coins: vec![coin("a", "a.png"), coin("b", "b.png"), coin("c", "c.png")],
            exchanges: vec![exchange("x"), exchange("y")],
            nfts: vec![nft("n")],
        };
        let balanced = balance_results(results);
        assert_eq!(balanced.coins.len(), 1);
        assert_eq!(balanced.exchanges.len(), 1);
        assert_eq!(balanced.nfts.len(), 1);
    }

    #[test]
    fn test_no_truncation_when_a_category_is_empty() {
        let results = SearchResponse {
            coins: vec![coin("a", "a.png"), coin("b", "b.png")],
            exchanges: vec![exchange("x")],
            nfts: vec![],
        };
        let balanced = balance_results(results);
        assert_eq!(balanced.coins.len(), 2);
        assert_eq!(balanced.exchanges.len(), 1);
    }
}
