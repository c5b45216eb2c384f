//! Aggregate saved watchlist entries into a preference profile.

use crate::models::{WatchlistEntry, WatchlistProfile};
use std::collections::{HashMap, HashSet};

/// Build the preference profile. Returns `None` for an empty watchlist —
/// there is nothing to personalize against.
pub fn build_profile(entries: &[WatchlistEntry]) -> Option<WatchlistProfile> {
    if entries.is_empty() {
        return None;
    }

    let mut sectors: HashMap<String, usize> = HashMap::new();
    let mut scores: Vec<f64> = Vec::new();
    let mut prices: Vec<f64> = Vec::new();
    let mut saved_symbols: HashSet<String> = HashSet::new();

    for entry in entries {
        if !entry.sector.is_empty() {
            *sectors.entry(entry.sector.clone()).or_insert(0) += 1;
        }
        if entry.score != 0 {
            scores.push(entry.score as f64);
        }
        if entry.price_at_save > 0.0 {
            prices.push(entry.price_at_save);
        }
        saved_symbols.insert(entry.symbol.to_uppercase());
    }

    let mut ranked: Vec<(&String, &usize)> = sectors.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let top_sectors: Vec<String> = ranked.iter().take(3).map(|(s, _)| (*s).clone()).collect();

    let total_saves: usize = sectors.values().sum::<usize>().max(1);
    let sector_weights: HashMap<String, f64> = sectors
        .iter()
        .map(|(s, c)| (s.clone(), *c as f64 / total_saves as f64))
        .collect();

    let (avg_score, min_score, max_score) = if scores.is_empty() {
        (50.0, 0.0, 100.0)
    } else {
        let sum: f64 = scores.iter().sum();
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (sum / scores.len() as f64, min, max)
    };

    let (avg_price, min_price, max_price) = if prices.is_empty() {
        (200.0, 0.0, 1000.0)
    } else {
        let sum: f64 = prices.iter().sum();
        let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (sum / prices.len() as f64, min, max)
    };

    Some(WatchlistProfile {
        sectors,
        sector_weights,
        top_sectors,
        avg_score,
        min_score,
        max_score,
        avg_price,
        min_price,
        max_price,
        count: entries.len(),
        saved_symbols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(symbol: &str, sector: &str, score: i64, price: f64) -> WatchlistEntry {
        WatchlistEntry {
            id: None,
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            sector: sector.to_string(),
            industry: String::new(),
            score,
            price_at_save: price,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn empty_watchlist_has_no_profile() {
        assert!(build_profile(&[]).is_none());
    }

    #[test]
    fn aggregates_sectors_and_ranges() {
        let entries = vec![
            entry("AAPL", "Technology", 72, 180.0),
            entry("MSFT", "Technology", 65, 410.0),
            entry("JPM", "Financial Services", 58, 190.0),
        ];
        let profile = build_profile(&entries).unwrap();

        assert_eq!(profile.count, 3);
        assert_eq!(profile.sectors["Technology"], 2);
        assert_eq!(profile.top_sectors[0], "Technology");
        assert!((profile.sector_weights["Technology"] - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.min_score, 58.0);
        assert_eq!(profile.max_score, 72.0);
        assert!((profile.avg_score - 65.0).abs() < 1e-9);
        assert_eq!(profile.min_price, 180.0);
        assert_eq!(profile.max_price, 410.0);
        assert!(profile.saved_symbols.contains("JPM"));
    }

    #[test]
    fn zero_scores_and_prices_fall_back_to_defaults() {
        let entries = vec![entry("X", "Energy", 0, 0.0)];
        let profile = build_profile(&entries).unwrap();
        assert_eq!(profile.avg_score, 50.0);
        assert_eq!(profile.max_score, 100.0);
        assert_eq!(profile.avg_price, 200.0);
        assert_eq!(profile.max_price, 1000.0);
    }

    #[test]
    fn top_sectors_capped_at_three() {
        let entries = vec![
            entry("A", "Tech", 50, 10.0),
            entry("B", "Energy", 50, 10.0),
            entry("C", "Health", 50, 10.0),
            entry("D", "Utilities", 50, 10.0),
        ];
        let profile = build_profile(&entries).unwrap();
        assert_eq!(profile.top_sectors.len(), 3);
    }
}
